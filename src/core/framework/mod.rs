//! Supported frameworks, package managers and stack presets.

mod catalog;
mod registry;

pub use registry::FrameworkRegistry;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkId {
    Nextjs,
    Nuxt,
    Astro,
    Sveltekit,
    Vue,
    Remix,
    Laravel,
}

impl FrameworkId {
    pub const ALL: [FrameworkId; 7] = [
        FrameworkId::Nextjs,
        FrameworkId::Nuxt,
        FrameworkId::Astro,
        FrameworkId::Sveltekit,
        FrameworkId::Vue,
        FrameworkId::Remix,
        FrameworkId::Laravel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameworkId::Nextjs => "nextjs",
            FrameworkId::Nuxt => "nuxt",
            FrameworkId::Astro => "astro",
            FrameworkId::Sveltekit => "sveltekit",
            FrameworkId::Vue => "vue",
            FrameworkId::Remix => "remix",
            FrameworkId::Laravel => "laravel",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for FrameworkId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameworkId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownFramework { id: s.to_string() })
    }
}

impl fmt::Display for FrameworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Yarn,
        PackageManager::Pnpm,
        PackageManager::Bun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Subcommand that adds packages to a manifest.
    pub fn add_subcommand(&self) -> &'static str {
        match self {
            PackageManager::Npm => "install",
            _ => "add",
        }
    }

    pub fn dev_flag(&self) -> &'static str {
        match self {
            PackageManager::Bun => "-d",
            _ => "-D",
        }
    }
}

impl FromStr for PackageManager {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageManager::ALL
            .into_iter()
            .find(|pm| pm.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPackageManager {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StackPreset {
    #[default]
    Minimal,
    Standard,
    Full,
}

impl StackPreset {
    pub const ALL: [StackPreset; 3] = [
        StackPreset::Minimal,
        StackPreset::Standard,
        StackPreset::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StackPreset::Minimal => "minimal",
            StackPreset::Standard => "standard",
            StackPreset::Full => "full",
        }
    }
}

impl FromStr for StackPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StackPreset::ALL
            .into_iter()
            .find(|stack| stack.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStack { id: s.to_string() })
    }
}

impl fmt::Display for StackPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkCategory {
    Nodejs,
    Php,
}

/// Optional feature flags an installer understands. Each value is a
/// whitespace-separated template split into discrete arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typescript: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eslint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tailwind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackDefinition {
    pub description: &'static str,
    pub dependencies: Vec<&'static str>,
    pub dev_dependencies: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    pub id: FrameworkId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FrameworkCategory,
    pub website: &'static str,
    /// Base install command per package manager, as a whitespace-separated template.
    pub install: [(PackageManager, &'static str); 4],
    pub flags: FeatureFlags,
    pub stacks: [(StackPreset, StackDefinition); 3],
    pub required_tools: Vec<&'static str>,
}

impl Framework {
    pub fn install_template(&self, pm: PackageManager) -> &'static str {
        self.install
            .iter()
            .find(|(candidate, _)| *candidate == pm)
            .map(|(_, template)| *template)
            .unwrap_or(self.install[0].1)
    }

    pub fn stack(&self, preset: StackPreset) -> &StackDefinition {
        self.stacks
            .iter()
            .find(|(candidate, _)| *candidate == preset)
            .map(|(_, stack)| stack)
            .unwrap_or(&self.stacks[0].1)
    }

    pub fn is_php(&self) -> bool {
        self.category == FrameworkCategory::Php
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_text() {
        for id in FrameworkId::ALL {
            assert_eq!(id.as_str().parse::<FrameworkId>().unwrap(), id);
        }
        let err = "rails".parse::<FrameworkId>().unwrap_err();
        assert_eq!(err.code().as_str(), "ORBIT-V004");
    }

    #[test]
    fn unknown_package_manager_is_v006() {
        let err = "pip".parse::<PackageManager>().unwrap_err();
        assert_eq!(err.code().as_str(), "ORBIT-V006");
        assert_eq!("pnpm".parse::<PackageManager>().unwrap(), PackageManager::Pnpm);
    }

    #[test]
    fn unknown_stack_is_v005() {
        let err = "huge".parse::<StackPreset>().unwrap_err();
        assert_eq!(err.code().as_str(), "ORBIT-V005");
        assert_eq!(StackPreset::default(), StackPreset::Minimal);
    }

    #[test]
    fn package_manager_verbs() {
        assert_eq!(PackageManager::Npm.add_subcommand(), "install");
        assert_eq!(PackageManager::Yarn.add_subcommand(), "add");
        assert_eq!(PackageManager::Bun.dev_flag(), "-d");
        assert_eq!(PackageManager::Pnpm.dev_flag(), "-D");
    }
}
