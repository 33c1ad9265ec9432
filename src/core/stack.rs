//! Stack preset configuration: formatter config files, git hook config and
//! manifest scripts layered on top of a freshly installed project.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::error::{Error, FilesystemError, Result};
use crate::framework::StackPreset;
use crate::safe_path;
use crate::utils::io;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: &'static str,
    pub contents: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackConfig {
    pub dev_dependencies: Vec<&'static str>,
    pub files: Vec<ConfigFile>,
    pub scripts: Vec<(&'static str, &'static str)>,
}

impl StackConfig {
    pub fn is_empty(&self) -> bool {
        self.dev_dependencies.is_empty() && self.files.is_empty() && self.scripts.is_empty()
    }
}

pub fn stack_config(preset: StackPreset) -> StackConfig {
    match preset {
        StackPreset::Minimal => StackConfig::default(),
        StackPreset::Standard => StackConfig {
            dev_dependencies: vec!["prettier", "eslint-config-prettier"],
            files: vec![ConfigFile {
                path: ".prettierrc",
                contents: json!({ "semi": true, "singleQuote": true, "tabWidth": 2 }),
            }],
            scripts: Vec::new(),
        },
        StackPreset::Full => StackConfig {
            dev_dependencies: vec![
                "prettier",
                "prettier-plugin-tailwindcss",
                "husky",
                "lint-staged",
            ],
            files: vec![
                ConfigFile {
                    path: ".prettierrc",
                    contents: json!({
                        "semi": true,
                        "singleQuote": true,
                        "tabWidth": 2,
                        "plugins": ["prettier-plugin-tailwindcss"],
                    }),
                },
                ConfigFile {
                    path: ".lintstagedrc",
                    contents: json!({
                        "*.{js,jsx,ts,tsx}": ["prettier --write", "eslint --fix"],
                    }),
                },
            ],
            scripts: vec![("prepare", "husky install"), ("format", "prettier --write .")],
        },
    }
}

/// Write the preset's config files and merge its scripts into the manifest.
/// Returns the files that were written.
pub fn apply_stack_config(project_dir: &Path, config: &StackConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for file in &config.files {
        let path = safe_path::resolve_safe(project_dir, file.path).ok_or_else(|| {
            Error::Filesystem(FilesystemError::PathTraversal {
                target: file.path.to_string(),
            })
        })?;
        io::write_json(&path, &file.contents, &format!("write {}", file.path))?;
        written.push(path);
    }

    if !config.scripts.is_empty() && merge_scripts(project_dir, &config.scripts)? {
        written.push(project_dir.join(MANIFEST_FILE));
    }

    tracing::debug!(dir = %project_dir.display(), files = written.len(), "applied stack config");
    Ok(written)
}

/// Merge `scripts` into the manifest's `scripts` map. Existing entries with
/// other names are kept. Returns false when the project has no manifest.
pub fn merge_scripts(project_dir: &Path, scripts: &[(&str, &str)]) -> Result<bool> {
    let manifest = project_dir.join(MANIFEST_FILE);
    if !manifest.is_file() {
        tracing::debug!(path = %manifest.display(), "no manifest, skipping scripts");
        return Ok(false);
    }

    let mut value = io::read_json(&manifest, "read package.json")?;
    let root = value.as_object_mut().ok_or_else(|| {
        Error::internal_json(
            "package.json is not a JSON object",
            Some("merge scripts".to_string()),
        )
    })?;

    let entry = root
        .entry("scripts")
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Some(map) = entry.as_object_mut() {
        for (name, command) in scripts {
            map.insert(name.to_string(), Value::String(command.to_string()));
        }
    }

    io::write_json(&manifest, &value, "write package.json")?;
    Ok(true)
}
