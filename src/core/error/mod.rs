pub mod codes;

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io;
use std::path::Path;

pub use codes::{all_codes, parse_code, ErrorCategory, ErrorCode};

const NAME_HINT: &str = "Use lowercase letters, numbers, and dashes only.";
const REPORT_HINT: &str =
    "Re-run with DEBUG=1 for details and include the output when reporting this issue.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationError {
    NameRequired,
    InvalidName { name: String, reason: String },
    NameTooLong { length: usize },
    UnknownFramework { id: String },
    UnknownStack { id: String },
    InvalidPackageManager { value: String },
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::NameRequired => ErrorCode::ValidationNameRequired,
            ValidationError::InvalidName { .. } => ErrorCode::ValidationInvalidName,
            ValidationError::NameTooLong { .. } => ErrorCode::ValidationNameTooLong,
            ValidationError::UnknownFramework { .. } => ErrorCode::ValidationUnknownFramework,
            ValidationError::UnknownStack { .. } => ErrorCode::ValidationUnknownStack,
            ValidationError::InvalidPackageManager { .. } => {
                ErrorCode::ValidationInvalidPackageManager
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "Project name is required",
            ValidationError::InvalidName { .. } => "Invalid project name",
            ValidationError::NameTooLong { .. } => "Project name too long",
            ValidationError::UnknownFramework { .. } => "Unknown framework",
            ValidationError::UnknownStack { .. } => "Unknown stack preset",
            ValidationError::InvalidPackageManager { .. } => "Invalid package manager",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ValidationError::NameRequired => "A project name is required.".to_string(),
            ValidationError::InvalidName { name, reason } => {
                format!("\"{}\" is not a valid project name: {}", name, reason)
            }
            ValidationError::NameTooLong { length } => {
                format!("Name is {} characters (max 50).", length)
            }
            ValidationError::UnknownFramework { id } => {
                format!("Framework \"{}\" is not supported.", id)
            }
            ValidationError::UnknownStack { id } => format!("Stack \"{}\" is not available.", id),
            ValidationError::InvalidPackageManager { value } => {
                format!("\"{}\" is not a valid package manager.", value)
            }
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        Some(match self {
            ValidationError::NameRequired => "Usage: orbit create <project-name>",
            ValidationError::InvalidName { .. } => NAME_HINT,
            ValidationError::NameTooLong { .. } => "Choose a shorter name.",
            ValidationError::UnknownFramework { .. } => {
                "Run \"orbit list\" to see available frameworks."
            }
            ValidationError::UnknownStack { .. } => "Available: minimal, standard, full",
            ValidationError::InvalidPackageManager { .. } => "Available: npm, yarn, pnpm, bun",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EnvironmentError {
    /// Every missing requirement, never just the first.
    MissingTools { tools: Vec<String> },
    ToolTooOld {
        tool: String,
        found: String,
        required: String,
    },
}

impl EnvironmentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            EnvironmentError::MissingTools { .. } => ErrorCode::EnvironmentMissingTools,
            EnvironmentError::ToolTooOld { .. } => ErrorCode::EnvironmentToolTooOld,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EnvironmentError::MissingTools { .. } => "Required tools missing",
            EnvironmentError::ToolTooOld { .. } => "Tool version too old",
        }
    }

    pub fn message(&self) -> String {
        match self {
            EnvironmentError::MissingTools { tools } => {
                format!("Missing required tools: {}.", tools.join(", "))
            }
            EnvironmentError::ToolTooOld {
                tool,
                found,
                required,
            } => format!(
                "Found {} {}, but {} or higher is required.",
                tool, found, required
            ),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        Some(match self {
            EnvironmentError::MissingTools { .. } => {
                "Install the missing tools, then run \"orbit doctor\" to verify."
            }
            EnvironmentError::ToolTooOld { .. } => "Update the tool and try again.",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FilesystemError {
    AlreadyExists { path: String },
    PermissionDenied { path: String },
    NotWritable { path: String },
    PathTraversal { target: String },
}

impl FilesystemError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FilesystemError::AlreadyExists { .. } => ErrorCode::FilesystemAlreadyExists,
            FilesystemError::PermissionDenied { .. } => ErrorCode::FilesystemPermissionDenied,
            FilesystemError::NotWritable { .. } => ErrorCode::FilesystemNotWritable,
            FilesystemError::PathTraversal { .. } => ErrorCode::FilesystemPathTraversal,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FilesystemError::AlreadyExists { .. } => "Directory already exists",
            FilesystemError::PermissionDenied { .. } => "Permission denied",
            FilesystemError::NotWritable { .. } => "Cannot write to directory",
            FilesystemError::PathTraversal { .. } => "Invalid path",
        }
    }

    pub fn message(&self) -> String {
        match self {
            FilesystemError::AlreadyExists { path } => {
                format!("Directory \"{}\" already exists.", path)
            }
            FilesystemError::PermissionDenied { path } if path.is_empty() => {
                "Permission denied.".to_string()
            }
            FilesystemError::PermissionDenied { path } => format!("Cannot access \"{}\".", path),
            FilesystemError::NotWritable { path } => {
                format!("Cannot create files in \"{}\".", path)
            }
            FilesystemError::PathTraversal { .. } => "Path traversal is not allowed.".to_string(),
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        Some(match self {
            FilesystemError::AlreadyExists { .. } => {
                "Choose a different name or delete the existing directory."
            }
            FilesystemError::PermissionDenied { .. } => {
                "Check file permissions or try a different location."
            }
            FilesystemError::NotWritable { .. } => {
                "Check write permissions or try a different location."
            }
            FilesystemError::PathTraversal { .. } => {
                "Use a simple directory name without \"..\" or absolute paths."
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CommandError {
    NotAllowed {
        program: String,
    },
    Failed {
        command: String,
        exit_status: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        signal: Option<String>,
        stderr: String,
    },
    Timeout {
        command: String,
        timeout_ms: u64,
    },
    FailedToStart {
        program: String,
        reason: String,
    },
}

impl CommandError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CommandError::NotAllowed { .. } => ErrorCode::CommandNotAllowed,
            CommandError::Failed { .. } => ErrorCode::CommandFailed,
            CommandError::Timeout { .. } => ErrorCode::CommandTimeout,
            CommandError::FailedToStart { .. } => ErrorCode::CommandFailedToStart,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CommandError::NotAllowed { .. } => "Command not allowed",
            CommandError::Failed { .. } => "Command failed",
            CommandError::Timeout { .. } => "Command timeout",
            CommandError::FailedToStart { .. } => "Command failed to start",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CommandError::NotAllowed { program } => {
                format!("Command \"{}\" is not permitted.", program)
            }
            CommandError::Failed {
                command,
                exit_status,
                signal,
                ..
            } => match (exit_status, signal) {
                (Some(code), _) => format!("\"{}\" exited with code {}.", command, code),
                (None, Some(signal)) => {
                    format!("\"{}\" was terminated by {}.", command, signal)
                }
                (None, None) => format!("\"{}\" exited abnormally.", command),
            },
            CommandError::Timeout {
                command,
                timeout_ms,
            } => format!(
                "\"{}\" took longer than {}ms and was cancelled.",
                command, timeout_ms
            ),
            CommandError::FailedToStart { program, reason } => {
                format!("Could not start \"{}\": {}", program, reason)
            }
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        Some(match self {
            CommandError::NotAllowed { .. } => "This is a security restriction.",
            CommandError::Failed { .. } => "Check the output above for details.",
            CommandError::Timeout { .. } => "Check your network connection and try again.",
            CommandError::FailedToStart { .. } => {
                "Make sure the command is installed and on your PATH."
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InternalError {
    Unexpected {
        detail: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<String>,
    },
}

impl InternalError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::InternalUnexpected
    }

    pub fn title(&self) -> &'static str {
        "Unexpected error"
    }

    pub fn message(&self) -> String {
        match self {
            InternalError::Unexpected { detail, context } => match context {
                _ if detail.is_empty() => "An unexpected error occurred.".to_string(),
                Some(context) => format!("{}: {}", context, detail),
                None => detail.clone(),
            },
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        Some(REPORT_HINT)
    }
}

macro_rules! display_via_message {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.message())
            }
        })*
    };
}

display_via_message!(
    ValidationError,
    EnvironmentError,
    FilesystemError,
    CommandError,
    InternalError
);

/// The closed error taxonomy. The variant is the category; the payload carries the
/// category-specific parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    Environment(EnvironmentError),
    #[error("{0}")]
    Filesystem(FilesystemError),
    #[error("{0}")]
    Command(CommandError),
    #[error("{0}")]
    Internal(InternalError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Error::Validation(e) => e.code(),
            Error::Environment(e) => e.code(),
            Error::Filesystem(e) => e.code(),
            Error::Command(e) => e.code(),
            Error::Internal(e) => e.code(),
        }
    }

    pub fn code(&self) -> &'static str {
        self.error_code().as_str()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation(_) => ErrorCategory::Validation,
            Error::Environment(_) => ErrorCategory::Environment,
            Error::Filesystem(_) => ErrorCategory::Filesystem,
            Error::Command(_) => ErrorCategory::Command,
            Error::Internal(_) => ErrorCategory::Internal,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Error::Validation(e) => e.title(),
            Error::Environment(e) => e.title(),
            Error::Filesystem(e) => e.title(),
            Error::Command(e) => e.title(),
            Error::Internal(e) => e.title(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Validation(e) => e.hint(),
            Error::Environment(e) => e.hint(),
            Error::Filesystem(e) => e.hint(),
            Error::Command(e) => e.hint(),
            Error::Internal(e) => e.hint(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn details(&self) -> Value {
        let details = match self {
            Error::Validation(e) => serde_json::to_value(e),
            Error::Environment(e) => serde_json::to_value(e),
            Error::Filesystem(e) => serde_json::to_value(e),
            Error::Command(e) => serde_json::to_value(e),
            Error::Internal(e) => serde_json::to_value(e),
        };
        details.unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }

    pub fn internal_unexpected(detail: impl Into<String>) -> Self {
        Error::Internal(InternalError::Unexpected {
            detail: detail.into(),
            context: None,
        })
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Error::Internal(InternalError::Unexpected {
            detail: error.into(),
            context,
        })
    }

    /// Classify an I/O failure on `path`. Permission problems belong to the
    /// user's filesystem (`ORBIT-F002`); anything else is unexpected.
    pub fn from_io(err: &io::Error, path: &Path, operation: &str) -> Self {
        if is_permission_error(err) {
            return Error::Filesystem(FilesystemError::PermissionDenied {
                path: path.display().to_string(),
            });
        }
        Self::internal_io(err.to_string(), Some(operation.to_string()))
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::internal_io(error, context)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<EnvironmentError> for Error {
    fn from(e: EnvironmentError) -> Self {
        Error::Environment(e)
    }
}

impl From<FilesystemError> for Error {
    fn from(e: FilesystemError) -> Self {
        Error::Filesystem(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

fn is_permission_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
    )
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if is_permission_error(&e) {
            return Error::Filesystem(FilesystemError::PermissionDenied {
                path: String::new(),
            });
        }
        Error::internal_io(e.to_string(), None)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::internal_json(e.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_drives_exit_code() {
        let err: Error = ValidationError::NameRequired.into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.code(), "ORBIT-V001");

        let err: Error = EnvironmentError::MissingTools {
            tools: vec!["node".to_string(), "npm".to_string()],
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.message(), "Missing required tools: node, npm.");

        let err: Error = FilesystemError::PathTraversal {
            target: "../x".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);

        let err: Error = CommandError::Timeout {
            command: "npm install".to_string(),
            timeout_ms: 10,
        }
        .into();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.code(), "ORBIT-C003");

        assert_eq!(Error::internal_unexpected("boom").exit_code(), 99);
    }

    #[test]
    fn timeout_and_failed_to_start_are_distinct_codes() {
        let timeout: Error = CommandError::Timeout {
            command: "x".to_string(),
            timeout_ms: 1,
        }
        .into();
        let start: Error = CommandError::FailedToStart {
            program: "x".to_string(),
            reason: "not found".to_string(),
        }
        .into();
        let failed: Error = CommandError::Failed {
            command: "x".to_string(),
            exit_status: Some(1),
            signal: None,
            stderr: String::new(),
        }
        .into();

        assert_ne!(timeout.code(), start.code());
        assert_ne!(timeout.code(), failed.code());
        assert_ne!(start.code(), failed.code());
    }

    #[test]
    fn details_serialize_payload_fields_in_camel_case() {
        let err: Error = CommandError::Failed {
            command: "npm create astro@latest my-app".to_string(),
            exit_status: Some(1),
            signal: None,
            stderr: "boom".to_string(),
        }
        .into();

        let details = err.details();
        assert_eq!(details["kind"], "failed");
        assert_eq!(details["exitStatus"], 1);
        assert_eq!(details["stderr"], "boom");
        assert!(details.get("signal").is_none());
    }

    #[test]
    fn internal_message_falls_back_when_detail_is_empty() {
        assert_eq!(
            Error::internal_unexpected("").message(),
            "An unexpected error occurred."
        );
        assert_eq!(
            Error::internal_io("denied", Some("write .prettierrc".to_string())).message(),
            "write .prettierrc: denied"
        );
    }

    #[test]
    fn permission_errors_are_filesystem_errors() {
        let err: Error = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.code(), "ORBIT-F002");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.message(), "Permission denied.");

        let err = Error::from_io(
            &io::Error::from(io::ErrorKind::ReadOnlyFilesystem),
            Path::new("/srv/my-app/.prettierrc"),
            "write .prettierrc",
        );
        assert_eq!(err.code(), "ORBIT-F002");
        assert_eq!(err.message(), "Cannot access \"/srv/my-app/.prettierrc\".");

        let err = Error::from_io(
            &io::Error::from(io::ErrorKind::NotFound),
            Path::new("/srv/my-app/package.json"),
            "read package.json",
        );
        assert_eq!(err.exit_code(), 99);
    }

    #[test]
    fn io_errors_become_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io.into();
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.hint().is_some());
    }
}
