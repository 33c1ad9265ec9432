// Public modules
pub mod create;
pub mod environment;
pub mod error;
pub mod executor;
pub mod framework;
pub mod git;
pub mod installer;
pub mod project;
pub mod safe_env;
pub mod safe_path;
pub mod settings;
pub mod stack;
pub mod tools;
pub mod validation;

// Re-export common types for convenience
pub use create::{CreateProject, ProgressEvent, Step};
pub use error::{Error, ErrorCategory, ErrorCode, Result};
pub use executor::{
    exec_or_throw, spawn, ExecutionResult, ProcessRunner, SpawnOptions, SystemRunner,
};
pub use framework::{FrameworkId, FrameworkRegistry, PackageManager, StackPreset};
pub use project::{CreateConfig, ProjectName, ProjectResult};
pub use settings::RuntimeSettings;
