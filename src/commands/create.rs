use std::path::Path;
use std::sync::mpsc;
use std::thread;

use clap::Args;
use serde::Serialize;

use orbit::error::ValidationError;
use orbit::framework::Framework;
use orbit::log_status;
use orbit::{
    CreateConfig, CreateProject, Error, FrameworkId, FrameworkRegistry, PackageManager,
    ProgressEvent, ProjectName, ProjectResult, StackPreset, SystemRunner,
};

use super::{CmdResult, GlobalArgs};
use crate::output::HumanOutput;
use crate::tty;

const DEFAULT_NAME: &str = "my-app";

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Project name (lowercase letters, numbers and hyphens)
    pub name: Option<String>,

    /// Framework id (see `orbit list`)
    #[arg(short = 't', long)]
    pub template: Option<String>,

    /// Package manager: npm, yarn, pnpm or bun
    #[arg(short = 'p', long = "pm")]
    pub package_manager: Option<String>,

    /// Stack preset: minimal, standard or full
    #[arg(short = 's', long)]
    pub stack: Option<String>,

    /// Skip prompts and use flags or defaults for everything
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Do not initialize a git repository
    #[arg(long)]
    pub no_git: bool,

    /// Pass the Tailwind flag to installers that support it
    #[arg(long)]
    pub tailwind: bool,

    /// Pass the src-directory flag to installers that support it
    #[arg(long)]
    pub src_dir: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CreateOutput {
    Created {
        framework: FrameworkId,
        package_manager: PackageManager,
        stack: StackPreset,
        #[serde(flatten)]
        project: ProjectResult,
    },
    Cancelled,
}

impl HumanOutput for CreateOutput {
    fn render_human(&self) -> String {
        match self {
            CreateOutput::Cancelled => "Operation cancelled.".to_string(),
            CreateOutput::Created { project, .. } => {
                let mut out = format!("\nCreated {}\n", project.project_path.display());
                if !project.warnings.is_empty() {
                    out.push_str("\nWarnings:\n");
                    for warning in &project.warnings {
                        out.push_str(&format!("  ! {}\n", warning));
                    }
                }
                out.push_str("\nNext steps:\n");
                for step in &project.next_steps {
                    out.push_str(&format!("  {}\n", step));
                }
                out
            }
        }
    }
}

/// A prompt the user walked away from.
struct Cancelled;

type Answer<T> = orbit::Result<std::result::Result<T, Cancelled>>;

fn ask_name() -> Answer<ProjectName> {
    loop {
        let Some(raw) = tty::prompt("Project name", Some(DEFAULT_NAME))? else {
            return Ok(Err(Cancelled));
        };
        match ProjectName::parse(&raw) {
            Ok(name) => return Ok(Ok(name)),
            Err(err) => eprintln!("  {}", err.message()),
        }
    }
}

fn ask_framework(registry: &FrameworkRegistry) -> Answer<FrameworkId> {
    let choices: Vec<(&str, String)> = registry
        .all()
        .map(|fw| (fw.id.as_str(), format!("{} - {}", fw.name, fw.description)))
        .collect();
    match tty::select("Which framework?", &choices)? {
        Some(id) => Ok(Ok(id.parse::<FrameworkId>()?)),
        None => Ok(Err(Cancelled)),
    }
}

fn ask_package_manager() -> Answer<PackageManager> {
    let choices: Vec<(&str, String)> = PackageManager::ALL
        .iter()
        .map(|pm| (pm.as_str(), pm.as_str().to_string()))
        .collect();
    match tty::select("Which package manager?", &choices)? {
        Some(pm) => Ok(Ok(pm.parse::<PackageManager>()?)),
        None => Ok(Err(Cancelled)),
    }
}

fn ask_stack(framework: &Framework) -> Answer<StackPreset> {
    let choices: Vec<(&str, String)> = StackPreset::ALL
        .iter()
        .map(|preset| {
            (
                preset.as_str(),
                format!("{} - {}", preset, framework.stack(*preset).description),
            )
        })
        .collect();
    match tty::select("Which stack preset?", &choices)? {
        Some(stack) => Ok(Ok(stack.parse::<StackPreset>()?)),
        None => Ok(Err(Cancelled)),
    }
}

macro_rules! answer {
    ($expr:expr) => {
        match $expr? {
            Ok(value) => value,
            Err(Cancelled) => return Ok(None),
        }
    };
}

/// Build the full configuration from flags, prompting for whatever is
/// missing when `interactive`. `None` means the user cancelled.
fn resolve_config(
    args: &CreateArgs,
    base_dir: &Path,
    registry: &FrameworkRegistry,
    interactive: bool,
) -> orbit::Result<Option<CreateConfig>> {
    let name = match (&args.name, interactive) {
        (Some(raw), _) => ProjectName::parse(raw)?,
        (None, true) => answer!(ask_name()),
        (None, false) => return Err(Error::Validation(ValidationError::NameRequired)),
    };
    let mut config = CreateConfig::defaults_for(name, base_dir);

    config.framework = match (&args.template, interactive) {
        (Some(id), _) => id.parse::<FrameworkId>()?,
        (None, true) => answer!(ask_framework(registry)),
        (None, false) => config.framework,
    };
    let framework = registry.get(config.framework);

    config.package_manager = match (&args.package_manager, interactive) {
        (Some(pm), _) => pm.parse::<PackageManager>()?,
        (None, true) if !framework.is_php() => answer!(ask_package_manager()),
        (None, _) => config.package_manager,
    };

    config.stack = match (&args.stack, interactive) {
        (Some(stack), _) => stack.parse::<StackPreset>()?,
        (None, true) => answer!(ask_stack(framework)),
        (None, false) => config.stack,
    };

    config.git = !args.no_git;
    config.features.tailwind = args.tailwind;
    config.features.src_dir = args.src_dir;

    Ok(Some(config))
}

fn render_event(event: &ProgressEvent, debug: bool) {
    match event {
        ProgressEvent::Started { project, framework } => {
            log_status!("create", "Creating {} with {}", project, framework)
        }
        ProgressEvent::Step { step } => log_status!("create", "{}...", step.label()),
        ProgressEvent::Output { chunk } => {
            if debug {
                eprint!("{}", chunk);
            }
        }
        ProgressEvent::Warning { message } => log_status!("warn", "{}", message),
        ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. } => {}
    }
}

pub fn run(args: CreateArgs, global: &GlobalArgs) -> CmdResult<CreateOutput> {
    let interactive = !args.yes && !global.json && tty::can_prompt();
    if interactive && !global.settings.suppress_banner {
        tty::banner(env!("CARGO_PKG_VERSION"));
    }

    let registry = FrameworkRegistry::new();
    let Some(config) = resolve_config(&args, &global.cwd, &registry, interactive)? else {
        return Ok((CreateOutput::Cancelled, 0));
    };

    tracing::debug!(
        name = config.name.as_str(),
        framework = config.framework.as_str(),
        package_manager = config.package_manager.as_str(),
        stack = config.stack.as_str(),
        base = %config.base_dir.display(),
        "resolved create config"
    );

    let runner = SystemRunner;
    let render = global.interactive_output();
    let debug = global.settings.debug;
    let (tx, rx) = mpsc::channel();

    let outcome = thread::scope(|scope| {
        let registry = &registry;
        let runner = &runner;
        let config = &config;
        let worker = scope.spawn(move || {
            CreateProject::new(registry, runner)
                .with_events(tx)
                .execute(config)
        });

        for event in rx {
            if render {
                render_event(&event, debug);
            }
        }

        worker.join()
    });

    let project = outcome.map_err(|_| Error::internal_unexpected("create worker panicked"))??;

    Ok((
        CreateOutput::Created {
            framework: config.framework,
            package_manager: config.package_manager,
            stack: config.stack,
            project,
        },
        0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: Option<&str>) -> CreateArgs {
        CreateArgs {
            name: name.map(str::to_string),
            yes: true,
            ..CreateArgs::default()
        }
    }

    #[test]
    fn non_interactive_uses_defaults() {
        let registry = FrameworkRegistry::new();
        let config = resolve_config(&args(Some("my-app")), Path::new("/tmp"), &registry, false)
            .unwrap()
            .unwrap();
        assert_eq!(config.name.as_str(), "my-app");
        assert_eq!(config.framework, FrameworkId::Nextjs);
        assert_eq!(config.package_manager, PackageManager::Npm);
        assert_eq!(config.stack, StackPreset::Minimal);
        assert!(config.git);
    }

    #[test]
    fn non_interactive_without_name_is_v001() {
        let registry = FrameworkRegistry::new();
        let err = resolve_config(&args(None), Path::new("/tmp"), &registry, false).unwrap_err();
        assert_eq!(err.code(), "ORBIT-V001");
    }

    #[test]
    fn flags_are_validated() {
        let registry = FrameworkRegistry::new();

        let mut a = args(Some("my-app"));
        a.template = Some("rails".to_string());
        let err = resolve_config(&a, Path::new("/tmp"), &registry, false).unwrap_err();
        assert_eq!(err.code(), "ORBIT-V004");

        let mut a = args(Some("my-app"));
        a.package_manager = Some("pip".to_string());
        let err = resolve_config(&a, Path::new("/tmp"), &registry, false).unwrap_err();
        assert_eq!(err.code(), "ORBIT-V006");

        let mut a = args(Some("my-app"));
        a.stack = Some("huge".to_string());
        let err = resolve_config(&a, Path::new("/tmp"), &registry, false).unwrap_err();
        assert_eq!(err.code(), "ORBIT-V005");

        let err = resolve_config(&args(Some("My App")), Path::new("/tmp"), &registry, false)
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn flags_fill_config() {
        let registry = FrameworkRegistry::new();
        let a = CreateArgs {
            name: Some("site".to_string()),
            template: Some("astro".to_string()),
            package_manager: Some("pnpm".to_string()),
            stack: Some("full".to_string()),
            yes: true,
            no_git: true,
            tailwind: true,
            src_dir: false,
        };
        let config = resolve_config(&a, Path::new("/tmp"), &registry, false)
            .unwrap()
            .unwrap();
        assert_eq!(config.framework, FrameworkId::Astro);
        assert_eq!(config.package_manager, PackageManager::Pnpm);
        assert_eq!(config.stack, StackPreset::Full);
        assert!(!config.git);
        assert!(config.features.tailwind);
    }

    #[test]
    fn created_output_renders_next_steps() {
        let output = CreateOutput::Created {
            framework: FrameworkId::Astro,
            package_manager: PackageManager::Npm,
            stack: StackPreset::Minimal,
            project: ProjectResult {
                success: true,
                project_path: "/tmp/my-app".into(),
                next_steps: vec!["cd my-app".to_string(), "npm run dev".to_string()],
                warnings: vec!["git commit failed".to_string()],
            },
        };
        let text = output.render_human();
        assert!(text.contains("cd my-app"));
        assert!(text.contains("! git commit failed"));

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "created");
        assert_eq!(json["projectPath"], "/tmp/my-app");
        assert_eq!(json["packageManager"], "npm");
    }
}
