use std::path::PathBuf;

use orbit::RuntimeSettings;

pub type CmdResult<T> = orbit::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub json: bool,
    /// Directory new projects are created in.
    pub cwd: PathBuf,
    pub settings: RuntimeSettings,
}

impl GlobalArgs {
    /// Decorative output only for a human at a terminal.
    pub fn interactive_output(&self) -> bool {
        !self.json && crate::tty::is_stderr_tty()
    }
}

/// Resolve `--cwd`, expanding `~` and `$VARS`. Defaults to the current directory.
pub fn resolve_cwd(raw: Option<&str>) -> orbit::Result<PathBuf> {
    let base = match raw {
        Some(raw) => {
            let expanded = shellexpand::full(raw).map_err(|e| {
                orbit::Error::internal_io(e.to_string(), Some("expand --cwd".to_string()))
            })?;
            PathBuf::from(expanded.as_ref())
        }
        None => PathBuf::from("."),
    };

    if base.is_absolute() {
        Ok(base)
    } else {
        let current = std::env::current_dir()
            .map_err(|e| {
                orbit::Error::internal_io(e.to_string(), Some("read current directory".to_string()))
            })?;
        Ok(current.join(base))
    }
}

pub mod create;
pub mod doctor;
pub mod list;

/// Dispatch a command to its handler and render the result.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::finish($module::run($args, $global), $global)
    };
}

pub(crate) fn run(command: crate::Commands, global: &GlobalArgs) -> i32 {
    match command {
        crate::Commands::Create(args) => dispatch!(args, global, create),
        crate::Commands::List(args) => dispatch!(args, global, list),
        crate::Commands::Doctor(args) => dispatch!(args, global, doctor),
    }
}
