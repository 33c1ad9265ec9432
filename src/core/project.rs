//! Project creation inputs and outputs.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::framework::{FrameworkId, PackageManager, StackPreset};
use crate::tools::DEFAULT_PROBE_TIMEOUT;
use crate::validation;

pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_DEPENDENCY_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_VERSION: &str = "latest";

/// A sanitized, validated project name. Only obtainable through `parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Sanitize `raw`, then validate what is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let check = validation::validate_and_sanitize(raw);
        match check.error {
            Some(err) => Err(Error::Validation(err)),
            None => Ok(ProjectName(check.sanitized)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProjectName::parse(s)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub typescript: bool,
    pub eslint: bool,
    pub tailwind: bool,
    pub src_dir: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            typescript: true,
            eslint: true,
            tailwind: false,
            src_dir: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub install: Duration,
    pub dependencies: Duration,
    pub probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            install: DEFAULT_INSTALL_TIMEOUT,
            dependencies: DEFAULT_DEPENDENCY_TIMEOUT,
            probe: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Everything one `create` run needs, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateConfig {
    pub name: ProjectName,
    pub base_dir: PathBuf,
    pub framework: FrameworkId,
    pub package_manager: PackageManager,
    pub stack: StackPreset,
    pub features: Features,
    pub git: bool,
    /// Installer version tag substituted for `@latest` in install templates.
    pub version: String,
    pub timeouts: Timeouts,
}

impl CreateConfig {
    pub fn defaults_for(name: ProjectName, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            name,
            base_dir: base_dir.into(),
            framework: FrameworkId::Nextjs,
            package_manager: PackageManager::Npm,
            stack: StackPreset::Minimal,
            features: Features::default(),
            git: true,
            version: DEFAULT_VERSION.to_string(),
            timeouts: Timeouts::default(),
        }
    }

    pub fn framework(mut self, id: FrameworkId) -> Self {
        self.framework = id;
        self
    }

    pub fn package_manager(mut self, pm: PackageManager) -> Self {
        self.package_manager = pm;
        self
    }

    pub fn stack(mut self, stack: StackPreset) -> Self {
        self.stack = stack;
        self
    }

    pub fn git(mut self, enabled: bool) -> Self {
        self.git = enabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResult {
    pub success: bool,
    pub project_path: PathBuf,
    pub next_steps: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn next_steps(name: &ProjectName, framework: FrameworkId, pm: PackageManager) -> Vec<String> {
    let run = match framework {
        FrameworkId::Laravel => "php artisan serve".to_string(),
        _ => format!("{} run dev", pm),
    };
    vec![format!("cd {}", name), run]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sanitizes_before_validating() {
        let name = ProjectName::parse("  my-app; ").unwrap();
        assert_eq!(name.as_str(), "my-app");

        let err = ProjectName::parse("$(rm -rf ~)").unwrap_err();
        assert_eq!(err.code(), "ORBIT-V002");
        assert_eq!(err.exit_code(), 1);

        assert_eq!(ProjectName::parse("   ").unwrap_err().code(), "ORBIT-V001");
    }

    #[test]
    fn defaults_are_enumerated_once() {
        let name = ProjectName::parse("my-app").unwrap();
        let config = CreateConfig::defaults_for(name, "/tmp");
        assert_eq!(config.framework, FrameworkId::Nextjs);
        assert_eq!(config.package_manager, PackageManager::Npm);
        assert_eq!(config.stack, StackPreset::Minimal);
        assert!(config.features.typescript && config.features.eslint);
        assert!(config.git);
        assert_eq!(config.version, "latest");
        assert_eq!(config.timeouts.install, Duration::from_secs(600));
        assert_eq!(config.timeouts.dependencies, Duration::from_secs(300));
        assert_eq!(config.timeouts.probe, Duration::from_secs(5));
    }

    #[test]
    fn next_steps_follow_framework() {
        let name = ProjectName::parse("my-app").unwrap();
        assert_eq!(
            next_steps(&name, FrameworkId::Astro, PackageManager::Pnpm),
            ["cd my-app", "pnpm run dev"]
        );
        assert_eq!(
            next_steps(&name, FrameworkId::Laravel, PackageManager::Npm),
            ["cd my-app", "php artisan serve"]
        );
    }
}
