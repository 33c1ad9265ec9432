//! The `create` use case: a fixed sequence over the validation, path,
//! environment and execution layers.

use std::path::Path;
use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::environment;
use crate::error::{Error, Result};
use crate::executor::{ProcessRunner, SpawnOptions};
use crate::framework::{Framework, FrameworkId, FrameworkRegistry, StackPreset};
use crate::git;
use crate::installer::{self, PlannedCommand, WorkDir};
use crate::project::{self, CreateConfig, ProjectResult};
use crate::safe_path;
use crate::stack;
use crate::tools::ToolDetector;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    ValidateName,
    PrepareDirectory,
    CheckEnvironment,
    Install,
    InstallDependencies,
    ApplyStack,
    InitGit,
}

impl Step {
    pub fn label(&self) -> &'static str {
        match self {
            Step::ValidateName => "Validating project name",
            Step::PrepareDirectory => "Checking target directory",
            Step::CheckEnvironment => "Checking required tools",
            Step::Install => "Running framework installer",
            Step::InstallDependencies => "Installing stack dependencies",
            Step::ApplyStack => "Applying stack configuration",
            Step::InitGit => "Initializing git repository",
        }
    }
}

/// Progress of one `create` run, in emission order.
///
/// Always `Started` first and exactly one of `Completed` / `Failed` last.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProgressEvent {
    Started {
        project: String,
        framework: FrameworkId,
    },
    Step {
        step: Step,
    },
    /// Installer output, chunk by chunk.
    Output {
        chunk: String,
    },
    Warning {
        message: String,
    },
    Completed {
        result: ProjectResult,
    },
    Failed {
        code: String,
        message: String,
    },
}

pub struct CreateProject<'a> {
    registry: &'a FrameworkRegistry,
    runner: &'a (dyn ProcessRunner + Sync),
    events: Option<Sender<ProgressEvent>>,
}

impl<'a> CreateProject<'a> {
    pub fn new(registry: &'a FrameworkRegistry, runner: &'a (dyn ProcessRunner + Sync)) -> Self {
        Self {
            registry,
            runner,
            events: None,
        }
    }

    pub fn with_events(mut self, events: Sender<ProgressEvent>) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    }

    fn step(&self, step: Step) {
        tracing::debug!(step = ?step, "{}", step.label());
        self.emit(ProgressEvent::Step { step });
    }

    pub fn execute(&self, config: &CreateConfig) -> Result<ProjectResult> {
        self.emit(ProgressEvent::Started {
            project: config.name.to_string(),
            framework: config.framework,
        });

        match self.run(config) {
            Ok(result) => {
                self.emit(ProgressEvent::Completed {
                    result: result.clone(),
                });
                Ok(result)
            }
            Err(err) => {
                tracing::debug!(code = err.code(), "create failed");
                self.emit(ProgressEvent::Failed {
                    code: err.code().to_string(),
                    message: err.message(),
                });
                Err(err)
            }
        }
    }

    fn run(&self, config: &CreateConfig) -> Result<ProjectResult> {
        let framework = self.registry.get(config.framework);

        self.step(Step::ValidateName);
        validation::validate_project_name(config.name.as_str())?;

        self.step(Step::PrepareDirectory);
        let project_path =
            safe_path::ensure_safe_project_dir(config.name.as_str(), &config.base_dir)?;

        self.step(Step::CheckEnvironment);
        let detector = ToolDetector::new(self.runner).with_timeout(config.timeouts.probe);
        environment::check_environment(framework, config.package_manager, &detector)
            .into_result()?;

        let plan = installer::build_install_plan(framework, config)?;

        self.step(Step::Install);
        self.run_planned(&plan.install, config, &project_path)?;
        if !project_path.is_dir() {
            return Err(Error::internal_io(
                format!("installer finished but {} was not created", project_path.display()),
                Some(plan.install.display()),
            ));
        }

        if !plan.post_install.is_empty() {
            self.step(Step::InstallDependencies);
            for command in &plan.post_install {
                self.run_planned(command, config, &project_path)?;
            }
        }

        if applies_stack_config(framework, config.stack) {
            self.step(Step::ApplyStack);
            stack::apply_stack_config(&project_path, &stack::stack_config(config.stack))?;
        }

        let mut warnings = Vec::new();
        if config.git {
            self.step(Step::InitGit);
            for warning in git::init_repository(self.runner, &project_path) {
                self.emit(ProgressEvent::Warning {
                    message: warning.clone(),
                });
                warnings.push(warning);
            }
        }

        Ok(ProjectResult {
            success: true,
            next_steps: project::next_steps(&config.name, config.framework, config.package_manager),
            project_path,
            warnings,
        })
    }

    fn run_planned(
        &self,
        command: &PlannedCommand,
        config: &CreateConfig,
        project_path: &Path,
    ) -> Result<()> {
        installer::ensure_allowed(&command.program)?;

        let (cwd, timeout) = match command.work_dir {
            WorkDir::Base => (config.base_dir.as_path(), config.timeouts.install),
            WorkDir::Project => (project_path, config.timeouts.dependencies),
        };

        let events = self.events.clone();
        let forward = move |chunk: &str| {
            if let Some(tx) = &events {
                let _ = tx.send(ProgressEvent::Output {
                    chunk: chunk.to_string(),
                });
            }
        };
        let options = SpawnOptions::new()
            .cwd(cwd)
            .timeout(timeout)
            .on_stdout(forward.clone())
            .on_stderr(forward);

        self.runner
            .run_or_throw(&command.program, &command.args, options)
            .map(|_| ())
    }
}

fn applies_stack_config(framework: &Framework, preset: StackPreset) -> bool {
    !framework.is_php() && preset != StackPreset::Minimal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::executor::ExecutionResult;
    use crate::framework::PackageManager;
    use crate::project::ProjectName;
    use std::fs;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers version probes, creates the project directory on install and
    /// records every invocation.
    struct FakeRunner {
        calls: Mutex<Vec<String>>,
        fail_install: bool,
    }

    impl FakeRunner {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_install: false,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn ok(stdout: &str) -> Result<ExecutionResult> {
        Ok(ExecutionResult {
            exit_status: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
            termination_signal: None,
        })
    }

    impl ProcessRunner for FakeRunner {
        fn run(
            &self,
            program: &str,
            args: &[String],
            options: SpawnOptions<'_>,
        ) -> Result<ExecutionResult> {
            if args.first().map(String::as_str) == Some("--version") {
                return match program {
                    "node" => ok("v20.11.0"),
                    "npm" => ok("10.2.4"),
                    _ => Err(Error::Command(CommandError::FailedToStart {
                        program: program.to_string(),
                        reason: "not found".to_string(),
                    })),
                };
            }

            self.calls
                .lock()
                .unwrap()
                .push(format!("{} {}", program, args.join(" ")));

            if program == "npm" && args.first().map(String::as_str) == Some("create") {
                if self.fail_install {
                    return Ok(ExecutionResult {
                        exit_status: Some(1),
                        stdout: String::new(),
                        stderr: "npm ERR! network".to_string(),
                        termination_signal: None,
                    });
                }
                let cwd = options.cwd.clone().unwrap();
                let name = args.iter().find(|a| a.as_str() == "my-app").unwrap();
                fs::create_dir(cwd.join(name)).unwrap();
                fs::write(cwd.join(name).join("package.json"), r#"{"name":"my-app"}"#).unwrap();
            }
            ok("")
        }
    }

    fn astro_config(base: &Path) -> CreateConfig {
        CreateConfig::defaults_for(ProjectName::parse("my-app").unwrap(), base)
            .framework(FrameworkId::Astro)
            .package_manager(PackageManager::Npm)
    }

    fn steps(events: &[ProgressEvent]) -> Vec<Step> {
        events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Step { step } => Some(*step),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn emits_steps_in_order_with_one_terminal_event() {
        let dir = TempDir::new().unwrap();
        let registry = FrameworkRegistry::new();
        let runner = FakeRunner::new();
        let (tx, rx) = mpsc::channel();

        let result = CreateProject::new(&registry, &runner)
            .with_events(tx)
            .execute(&astro_config(dir.path()))
            .unwrap();
        assert!(result.success);

        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(events.first(), Some(ProgressEvent::Started { .. })));
        assert!(matches!(events.last(), Some(ProgressEvent::Completed { .. })));
        let terminal = events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. } | ProgressEvent::Failed { .. }))
            .count();
        assert_eq!(terminal, 1);
        assert_eq!(
            steps(&events),
            [
                Step::ValidateName,
                Step::PrepareDirectory,
                Step::CheckEnvironment,
                Step::Install,
                Step::InitGit,
            ]
        );
        assert_eq!(
            runner.calls(),
            [
                "npm create astro@latest my-app --template with-typescript",
                "git init",
                "git add .",
                "git commit -m Initial commit from ORBIT CLI",
            ]
        );
    }

    #[test]
    fn standard_stack_installs_and_configures() {
        let dir = TempDir::new().unwrap();
        let registry = FrameworkRegistry::new();
        let runner = FakeRunner::new();
        let config = astro_config(dir.path()).stack(StackPreset::Standard).git(false);

        let result = CreateProject::new(&registry, &runner).execute(&config).unwrap();

        assert!(result.warnings.is_empty());
        assert!(dir.path().join("my-app/.prettierrc").is_file());
        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1], "npm install @astrojs/mdx");
        assert!(calls[2].ends_with(" -D"));
    }

    #[test]
    fn existing_directory_aborts_before_any_command() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("my-app")).unwrap();
        let registry = FrameworkRegistry::new();
        let runner = FakeRunner::new();
        let (tx, rx) = mpsc::channel();

        let err = CreateProject::new(&registry, &runner)
            .with_events(tx)
            .execute(&astro_config(dir.path()))
            .unwrap_err();

        assert_eq!(err.code(), "ORBIT-F001");
        assert!(runner.calls().is_empty());
        let events: Vec<_> = rx.try_iter().collect();
        assert!(matches!(
            events.last(),
            Some(ProgressEvent::Failed { code, .. }) if code == "ORBIT-F001"
        ));
    }

    #[test]
    fn missing_tools_abort_before_install() {
        let dir = TempDir::new().unwrap();
        let registry = FrameworkRegistry::new();
        let runner = FakeRunner::new();
        let config = astro_config(dir.path()).framework(FrameworkId::Laravel);

        let err = CreateProject::new(&registry, &runner).execute(&config).unwrap_err();
        assert_eq!(err.code(), "ORBIT-E001");
        assert!(err.message().contains("php, composer"));
        assert!(runner.calls().is_empty());
        assert!(!dir.path().join("my-app").exists());
    }

    #[test]
    fn installer_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let registry = FrameworkRegistry::new();
        let mut runner = FakeRunner::new();
        runner.fail_install = true;

        let err = CreateProject::new(&registry, &runner)
            .execute(&astro_config(dir.path()))
            .unwrap_err();
        assert_eq!(err.code(), "ORBIT-C002");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(runner.calls().len(), 1);
    }
}
