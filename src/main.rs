use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::GlobalArgs;
use orbit::RuntimeSettings;

mod commands;
mod output;
mod tty;

use commands::{create, doctor, list};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "orbit")]
#[command(version = VERSION)]
#[command(about = "Scaffold web projects by safely driving framework installers")]
struct Cli {
    /// Print results as a JSON envelope on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Directory to create projects in (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Create(create::CreateArgs),
    /// List supported frameworks, or show one in detail
    #[command(visible_alias = "ls")]
    List(list::ListArgs),
    /// Check that required tools are installed
    Doctor(doctor::DoctorArgs),
}

/// `RUST_LOG` wins when set; otherwise DEBUG turns on debug-level diagnostics.
fn setup_logging(settings: &RuntimeSettings) {
    let default_level = if settings.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let settings = RuntimeSettings::from_env();
    setup_logging(&settings);

    let cwd = match commands::resolve_cwd(cli.cwd.as_deref()) {
        Ok(cwd) => cwd,
        Err(err) => {
            if cli.json {
                let _ = output::print_json_result(Err(err.clone()));
            } else {
                output::print_error(&err, settings.debug);
            }
            return std::process::ExitCode::from(exit_code_to_u8(err.exit_code()));
        }
    };

    let global = GlobalArgs {
        json: cli.json,
        cwd,
        settings,
    };

    let exit_code = commands::run(cli.command, &global);
    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
