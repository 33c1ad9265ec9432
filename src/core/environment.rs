//! Required-tool checks for project creation, and the `doctor` report.

use semver::Version;
use serde::Serialize;

use crate::error::{EnvironmentError, Error, Result};
use crate::framework::{Framework, PackageManager};
use crate::tools::{ToolDetector, ToolSpec, ToolStatus};

pub const MIN_NODE_VERSION: &str = "18.0.0";

const DOCTOR_REQUIRED: &[&str] = &["node", "npm", "git"];
const DOCTOR_OPTIONAL: &[&str] = &["pnpm", "yarn", "bun", "php", "composer"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentCheck {
    pub tools: Vec<ToolStatus>,
    pub all_met: bool,
    pub missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdated: Option<OutdatedTool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedTool {
    pub tool: String,
    pub found: String,
    pub required: String,
}

impl EnvironmentCheck {
    /// Missing tools win over an outdated one; every missing tool is listed.
    pub fn into_result(self) -> Result<Vec<ToolStatus>> {
        if !self.missing.is_empty() {
            return Err(Error::Environment(EnvironmentError::MissingTools {
                tools: self.missing,
            }));
        }
        if let Some(outdated) = self.outdated {
            return Err(Error::Environment(EnvironmentError::ToolTooOld {
                tool: outdated.tool,
                found: outdated.found,
                required: outdated.required,
            }));
        }
        Ok(self.tools)
    }
}

/// Tools a framework needs before its installer can run. Node.js frameworks
/// also need the chosen package manager; PHP frameworks install through composer.
pub fn required_tools(framework: &Framework, package_manager: PackageManager) -> Vec<&'static str> {
    let mut tools = vec!["node", "npm"];
    let pm = package_manager.as_str();
    if !framework.is_php() && !tools.contains(&pm) {
        tools.push(pm);
    }
    for &tool in &framework.required_tools {
        if !tools.contains(&tool) {
            tools.push(tool);
        }
    }
    tools
}

fn node_too_old(status: &ToolStatus) -> Option<OutdatedTool> {
    if status.name != "node" || !status.installed {
        return None;
    }
    let found = status.version.as_deref()?;
    let found_version = Version::parse(found).ok()?;
    let minimum = Version::parse(MIN_NODE_VERSION).ok()?;
    (found_version < minimum).then(|| OutdatedTool {
        tool: "node".to_string(),
        found: found.to_string(),
        required: MIN_NODE_VERSION.to_string(),
    })
}

pub fn check_environment(
    framework: &Framework,
    package_manager: PackageManager,
    detector: &ToolDetector<'_>,
) -> EnvironmentCheck {
    let specs: Vec<ToolSpec<'_>> = required_tools(framework, package_manager)
        .into_iter()
        .map(ToolSpec::required)
        .collect();
    let tools = detector.detect_all(&specs);

    let missing: Vec<String> = tools
        .iter()
        .filter(|t| !t.installed)
        .map(|t| t.name.clone())
        .collect();
    let outdated = tools.iter().find_map(node_too_old);

    EnvironmentCheck {
        all_met: missing.is_empty() && outdated.is_none(),
        tools,
        missing,
        outdated,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    pub tools: Vec<ToolStatus>,
    pub healthy: bool,
    pub missing_required: Vec<String>,
}

pub fn doctor(detector: &ToolDetector<'_>) -> DoctorReport {
    let specs: Vec<ToolSpec<'_>> = DOCTOR_REQUIRED
        .iter()
        .map(|name| ToolSpec::required(name))
        .chain(DOCTOR_OPTIONAL.iter().map(|name| ToolSpec::optional(name)))
        .collect();
    let tools = detector.detect_all(&specs);

    let missing_required: Vec<String> = tools
        .iter()
        .filter(|t| t.required && !t.installed)
        .map(|t| t.name.clone())
        .collect();

    DoctorReport {
        healthy: missing_required.is_empty(),
        tools,
        missing_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CommandError, ErrorCode};
    use crate::executor::{ExecutionResult, ProcessRunner, SpawnOptions};
    use crate::framework::{FrameworkId, FrameworkRegistry};

    struct Versions(&'static [(&'static str, &'static str)]);

    impl ProcessRunner for Versions {
        fn run(
            &self,
            program: &str,
            _args: &[String],
            _options: SpawnOptions<'_>,
        ) -> Result<ExecutionResult> {
            match self.0.iter().find(|(name, _)| *name == program) {
                Some((_, version)) => Ok(ExecutionResult {
                    exit_status: Some(0),
                    stdout: format!("{}\n", version),
                    stderr: String::new(),
                    termination_signal: None,
                }),
                None => Err(Error::Command(CommandError::FailedToStart {
                    program: program.to_string(),
                    reason: "not found".to_string(),
                })),
            }
        }
    }

    #[test]
    fn node_frameworks_need_node_and_npm() {
        let registry = FrameworkRegistry::new();
        assert_eq!(
            required_tools(registry.get(FrameworkId::Astro), PackageManager::Npm),
            ["node", "npm"]
        );
        assert_eq!(
            required_tools(registry.get(FrameworkId::Laravel), PackageManager::Pnpm),
            ["node", "npm", "php", "composer"]
        );
    }

    #[test]
    fn chosen_package_manager_is_required() {
        let registry = FrameworkRegistry::new();
        assert_eq!(
            required_tools(registry.get(FrameworkId::Astro), PackageManager::Bun),
            ["node", "npm", "bun"]
        );

        let runner = Versions(&[("node", "v20.0.0"), ("npm", "10.2.4")]);
        let detector = ToolDetector::new(&runner);
        let check = check_environment(
            registry.get(FrameworkId::Sveltekit),
            PackageManager::Pnpm,
            &detector,
        );
        assert_eq!(check.missing, ["pnpm"]);
        let err = check.into_result().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn lists_every_missing_tool() {
        let runner = Versions(&[("node", "v20.0.0")]);
        let detector = ToolDetector::new(&runner);
        let registry = FrameworkRegistry::new();

        let check = check_environment(
            registry.get(FrameworkId::Laravel),
            PackageManager::Npm,
            &detector,
        );
        assert!(!check.all_met);
        assert_eq!(check.missing, ["npm", "php", "composer"]);

        let err = check.into_result().unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::EnvironmentMissingTools);
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("npm, php, composer"));
    }

    #[test]
    fn old_node_is_rejected() {
        let runner = Versions(&[("node", "v16.20.2"), ("npm", "8.19.4")]);
        let detector = ToolDetector::new(&runner);
        let registry = FrameworkRegistry::new();

        let check = check_environment(
            registry.get(FrameworkId::Nextjs),
            PackageManager::Npm,
            &detector,
        );
        assert!(check.missing.is_empty());
        assert!(!check.all_met);
        let err = check.into_result().unwrap_err();
        assert_eq!(err.code(), "ORBIT-E002");
    }

    #[test]
    fn satisfied_environment_passes() {
        let runner = Versions(&[("node", "v18.0.0"), ("npm", "10.2.4")]);
        let detector = ToolDetector::new(&runner);
        let registry = FrameworkRegistry::new();

        let check = check_environment(
            registry.get(FrameworkId::Vue),
            PackageManager::Npm,
            &detector,
        );
        assert!(check.all_met);
        assert_eq!(check.into_result().unwrap().len(), 2);
    }

    #[test]
    fn doctor_only_fails_on_required_tools() {
        let runner = Versions(&[
            ("node", "v20.1.0"),
            ("npm", "10.0.0"),
            ("git", "git version 2.40.1"),
        ]);
        let report = doctor(&ToolDetector::new(&runner));
        assert!(report.healthy);
        assert_eq!(report.tools.len(), 8);

        let runner = Versions(&[("node", "v20.1.0"), ("bun", "1.0.0")]);
        let report = doctor(&ToolDetector::new(&runner));
        assert!(!report.healthy);
        assert_eq!(report.missing_required, ["npm", "git"]);
    }
}
