//! Repository initialization for a new project. Failures never abort.

use std::path::Path;

use crate::executor::{display_command, ProcessRunner, SpawnOptions};

pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit from ORBIT CLI";

fn steps() -> [Vec<String>; 3] {
    [
        vec!["init".to_string()],
        vec!["add".to_string(), ".".to_string()],
        vec![
            "commit".to_string(),
            "-m".to_string(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        ],
    ]
}

/// Run `git init`, `git add .` and the initial commit inside `project_dir`.
///
/// Stops at the first failing step and returns it as a warning. An empty
/// vector means the repository was created and committed.
pub fn init_repository(runner: &dyn ProcessRunner, project_dir: &Path) -> Vec<String> {
    for args in steps() {
        let command = display_command("git", &args);
        let outcome = runner.run("git", &args, SpawnOptions::new().cwd(project_dir));

        let warning = match outcome {
            Ok(result) if result.success() => continue,
            Ok(result) => format!("Git step \"{}\" failed: {}", command, result.error_text()),
            Err(err) => format!("Git step \"{}\" failed: {}", command, err.message()),
        };

        tracing::warn!(dir = %project_dir.display(), "{}", warning);
        return vec![warning];
    }

    Vec::new()
}
