//! Turns a create configuration into concrete argv vectors.
//!
//! The project name is appended as its own argument; templates and flags
//! come from the framework catalog and are split on whitespace. Nothing is
//! ever joined into a command string.

use serde::Serialize;

use crate::error::{CommandError, Error, Result};
use crate::executor::display_command;
use crate::framework::{Framework, PackageManager, StackPreset};
use crate::project::{CreateConfig, Features};
use crate::stack;
use crate::utils::shell::split_template;

/// Programs the create flow is allowed to execute.
pub const ALLOWED_PROGRAMS: &[&str] =
    &["npm", "npx", "pnpm", "yarn", "bun", "bunx", "composer", "git"];

pub fn ensure_allowed(program: &str) -> Result<()> {
    if ALLOWED_PROGRAMS.contains(&program) {
        Ok(())
    } else {
        Err(Error::Command(CommandError::NotAllowed {
            program: program.to_string(),
        }))
    }
}

/// Where a planned command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkDir {
    /// The directory the project is created in.
    Base,
    /// The new project directory.
    Project,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: WorkDir,
}

impl PlannedCommand {
    fn new(argv: Vec<String>, work_dir: WorkDir) -> Result<Self> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .ok_or_else(|| Error::internal_unexpected("empty install command template"))?;
        ensure_allowed(&program)?;
        Ok(Self {
            program,
            args: argv.collect(),
            work_dir,
        })
    }

    pub fn display(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallPlan {
    /// The framework's own scaffolder. Fatal on failure.
    pub install: PlannedCommand,
    /// Dependency installs run inside the new project.
    pub post_install: Vec<PlannedCommand>,
}

fn feature_args(framework: &Framework, features: &Features) -> Vec<String> {
    let flags = &framework.flags;
    [
        (features.typescript, flags.typescript),
        (features.eslint, flags.eslint),
        (features.tailwind, flags.tailwind),
        (features.src_dir, flags.src_dir),
    ]
    .into_iter()
    .filter_map(|(enabled, flag)| if enabled { flag } else { None })
    .flat_map(split_template)
    .collect()
}

fn pin_version(args: Vec<String>, version: &str) -> Vec<String> {
    if version == "latest" {
        return args;
    }
    args.into_iter()
        .map(|arg| match arg.strip_suffix("@latest") {
            Some(package) => format!("{}@{}", package, version),
            None => arg,
        })
        .collect()
}

fn add_packages(pm: PackageManager, packages: &[&str], dev: bool) -> Vec<String> {
    let mut argv = vec![pm.as_str().to_string(), pm.add_subcommand().to_string()];
    argv.extend(packages.iter().map(|p| p.to_string()));
    if dev {
        argv.push(pm.dev_flag().to_string());
    }
    argv
}

fn merge_unique(first: &[&'static str], second: &[&'static str]) -> Vec<&'static str> {
    let mut merged: Vec<&'static str> = Vec::with_capacity(first.len() + second.len());
    for pkg in first.iter().chain(second) {
        if !merged.contains(pkg) {
            merged.push(*pkg);
        }
    }
    merged
}

pub fn build_install_plan(framework: &Framework, config: &CreateConfig) -> Result<InstallPlan> {
    let pm = config.package_manager;

    let mut argv = pin_version(split_template(framework.install_template(pm)), &config.version);
    argv.push(config.name.as_str().to_string());
    argv.extend(feature_args(framework, &config.features));
    let install = PlannedCommand::new(argv, WorkDir::Base)?;

    let preset = framework.stack(config.stack);
    let extra_dev = if framework.is_php() || config.stack == StackPreset::Minimal {
        Vec::new()
    } else {
        stack::stack_config(config.stack).dev_dependencies
    };
    let dev_dependencies = merge_unique(&preset.dev_dependencies, &extra_dev);

    let mut post_install = Vec::new();
    if !preset.dependencies.is_empty() {
        post_install.push(PlannedCommand::new(
            add_packages(pm, &preset.dependencies, false),
            WorkDir::Project,
        )?);
    }
    if !dev_dependencies.is_empty() {
        post_install.push(PlannedCommand::new(
            add_packages(pm, &dev_dependencies, true),
            WorkDir::Project,
        )?);
    }

    Ok(InstallPlan {
        install,
        post_install,
    })
}
