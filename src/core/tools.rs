//! External tool detection (`<tool> --version` probes).

use std::time::Duration;

use regex::Regex;
use serde::Serialize;

use crate::executor::{ProcessRunner, SpawnOptions};
use crate::safe_env::EnvPolicy;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Variables a `--version` probe may see. Everything else is withheld.
const PROBE_ENV: &[&str] = &[
    "PATH",
    "HOME",
    "USERPROFILE",
    "SYSTEMROOT",
    "APPDATA",
    "LOCALAPPDATA",
    "LANG",
    "TMPDIR",
    "TEMP",
    "NVM_DIR",
    "VOLTA_HOME",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatus {
    pub name: String,
    pub installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub required: bool,
}

/// A tool to probe and whether its absence blocks the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSpec<'a> {
    pub name: &'a str,
    pub required: bool,
}

impl<'a> ToolSpec<'a> {
    pub fn required(name: &'a str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub fn optional(name: &'a str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// First `MAJOR.MINOR.PATCH` in a tool's version banner, without a leading `v`.
pub fn parse_version(output: &str) -> Option<String> {
    let re = Regex::new(r"v?(\d+\.\d+\.\d+)").ok()?;
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct ToolDetector<'r> {
    runner: &'r (dyn ProcessRunner + Sync),
    timeout: Duration,
}

impl<'r> ToolDetector<'r> {
    pub fn new(runner: &'r (dyn ProcessRunner + Sync)) -> Self {
        Self {
            runner,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe one tool. Any failure (missing binary, timeout, non-zero exit)
    /// reports the tool as not installed.
    pub fn detect(&self, spec: ToolSpec<'_>) -> ToolStatus {
        let options = SpawnOptions::new()
            .timeout(self.timeout)
            .env_policy(EnvPolicy::Allowlist(
                PROBE_ENV.iter().map(|k| k.to_string()).collect(),
            ));
        let args = vec!["--version".to_string()];

        let (installed, version) = match self.runner.run(spec.name, &args, options) {
            Ok(result) if result.success() => {
                let version =
                    parse_version(&result.stdout).or_else(|| parse_version(&result.stderr));
                (true, version)
            }
            Ok(result) => {
                tracing::debug!(
                    tool = spec.name,
                    exit_status = ?result.exit_status,
                    "probe exited non-zero"
                );
                (false, None)
            }
            Err(err) => {
                tracing::debug!(tool = spec.name, code = err.code(), "probe failed");
                (false, None)
            }
        };

        ToolStatus {
            name: spec.name.to_string(),
            installed,
            version,
            required: spec.required,
        }
    }

    /// Probe every tool concurrently and wait for all of them. Results keep input order.
    pub fn detect_all(&self, specs: &[ToolSpec<'_>]) -> Vec<ToolStatus> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = specs
                .iter()
                .map(|spec| (spec, scope.spawn(move || self.detect(*spec))))
                .collect();

            handles
                .into_iter()
                .map(|(spec, handle)| {
                    handle.join().unwrap_or_else(|_| ToolStatus {
                        name: spec.name.to_string(),
                        installed: false,
                        version: None,
                        required: spec.required,
                    })
                })
                .collect()
        })
    }
}
