//! Template directory layout and rendering
//!
//! A template directory may carry a `package.json` with a
//! `boilerplateConfig` section:
//!
//! ```json
//! {
//!   "name": "midway-boilerplate-web",
//!   "boilerplateConfig": {
//!     "root": "boilerplate",
//!     "parameters": {
//!       "name": { "desc": "Project name", "default": "demo" }
//!     }
//!   }
//! }
//! ```
//!
//! Without it the project files are read from `boilerplate/` when that
//! directory exists, otherwise from the template directory itself.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ParameterSchema, ParameterSpec, Parameters};
use crate::error::{InitError, InitResult};

/// Manifest file inside a template directory
const MANIFEST_FILE: &str = "package.json";

/// Key of the template configuration inside the manifest
const MANIFEST_KEY: &str = "boilerplateConfig";

/// Conventional directory holding the project files
const DEFAULT_ROOT: &str = "boilerplate";

/// Directories never copied into a project
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Placeholder delimiters
const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Files npm would strip or misinterpret, stored under another name
const RENAMES: &[(&str, &str)] = &[
    ("_gitignore", ".gitignore"),
    ("_npmignore", ".npmignore"),
    ("_package.json", "package.json"),
];

#[derive(Debug, Default, Deserialize)]
struct BoilerplateConfig {
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    parameters: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    #[serde(default, alias = "description")]
    desc: String,
    #[serde(default)]
    default: serde_json::Value,
}

/// Resolved layout of a template directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    files_root: PathBuf,
    schema: ParameterSchema,
}

impl TemplateLayout {
    /// Inspect a template directory
    ///
    /// # Errors
    ///
    /// Returns [`InitError::GenerationFailure`] if the directory is missing,
    /// the manifest is malformed, or the configured root does not exist.
    pub fn read(template_dir: &Path) -> InitResult<Self> {
        if !template_dir.is_dir() {
            return Err(InitError::generation(format!(
                "template directory not found: {}",
                template_dir.display()
            )));
        }

        let config = Self::read_config(template_dir)?;

        let files_root = match &config.root {
            Some(root) => template_dir.join(root),
            None if template_dir.join(DEFAULT_ROOT).is_dir() => template_dir.join(DEFAULT_ROOT),
            None => template_dir.to_path_buf(),
        };
        if !files_root.is_dir() {
            return Err(InitError::generation(format!(
                "template root not found: {}",
                files_root.display()
            )));
        }

        let parameters = config
            .parameters
            .into_iter()
            .map(|(name, value)| {
                let raw: RawParameter = serde_json::from_value(value).map_err(|e| {
                    InitError::generation(format!("invalid parameter '{name}': {e}"))
                })?;
                Ok(ParameterSpec {
                    name,
                    description: raw.desc,
                    default: default_to_string(raw.default),
                })
            })
            .collect::<InitResult<Vec<_>>>()?;

        Ok(Self {
            files_root,
            schema: ParameterSchema::new(parameters),
        })
    }

    fn read_config(template_dir: &Path) -> InitResult<BoilerplateConfig> {
        let manifest_path = template_dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(BoilerplateConfig::default());
        }

        let content = fs::read_to_string(&manifest_path).map_err(|e| {
            InitError::generation(format!("failed to read {}: {e}", manifest_path.display()))
        })?;
        let mut manifest: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            InitError::generation(format!("invalid {}: {e}", manifest_path.display()))
        })?;

        match manifest.get_mut(MANIFEST_KEY).map(serde_json::Value::take) {
            Some(section) => serde_json::from_value(section).map_err(|e| {
                InitError::generation(format!("invalid {MANIFEST_KEY} section: {e}"))
            }),
            None => Ok(BoilerplateConfig::default()),
        }
    }

    /// Directory the project files are copied from
    #[must_use]
    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    /// Declared parameters
    #[must_use]
    pub const fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Copy the template into `target`, rendering declared parameters
    ///
    /// Only `{{key}}` placeholders (inner whitespace allowed) naming a supplied
    /// parameter are replaced. Any other `{{ ... }}` text is copied as is.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`InitError::GenerationFailure`] if `target` is a non-empty
    /// directory or a file, or if any read, render or write fails.
    pub fn render(&self, target: &Path, parameters: Option<&Parameters>) -> InitResult<usize> {
        ensure_empty_target(target)?;
        fs::create_dir_all(target).map_err(|e| {
            InitError::generation(format!("failed to create {}: {e}", target.display()))
        })?;

        let parameters = parameters.filter(|p| !p.is_empty());

        let mut written = 0;
        let walker = WalkDir::new(&self.files_root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_skipped(entry));

        for entry in walker {
            let entry = entry.map_err(|e| InitError::generation(format!("failed to walk template: {e}")))?;
            let relative = entry
                .path()
                .strip_prefix(&self.files_root)
                .map_err(|e| InitError::generation(e.to_string()))?;
            let destination = target.join(output_path(relative));

            if entry.file_type().is_dir() {
                fs::create_dir_all(&destination).map_err(|e| {
                    InitError::generation(format!("failed to create {}: {e}", destination.display()))
                })?;
                continue;
            }

            write_file(entry.path(), &destination, parameters)?;
            written += 1;
        }

        tracing::debug!(files = written, target = %target.display(), "template rendered");
        Ok(written)
    }
}

fn default_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn is_skipped(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Apply file renames to the last path component
fn output_path(relative: &Path) -> PathBuf {
    let renamed = relative
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| RENAMES.iter().find(|(from, _)| *from == name))
        .map(|(_, to)| *to);

    match renamed {
        Some(to) => relative.with_file_name(to),
        None => relative.to_path_buf(),
    }
}

fn ensure_empty_target(target: &Path) -> InitResult<()> {
    if !target.exists() {
        return Ok(());
    }
    if !target.is_dir() {
        return Err(InitError::generation(format!(
            "target exists and is not a directory: {}",
            target.display()
        )));
    }
    let mut entries = fs::read_dir(target).map_err(|e| {
        InitError::generation(format!("failed to read {}: {e}", target.display()))
    })?;
    if entries.next().is_some() {
        return Err(InitError::generation(format!(
            "target directory is not empty: {}",
            target.display()
        )));
    }
    Ok(())
}

/// Replace placeholders naming a parameter, leaving every other span intact
fn substitute(text: &str, parameters: &Parameters) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        output.push_str(&rest[..start]);
        match parameters.get(after_open[..end].trim()) {
            Some(value) => output.push_str(value),
            None => output.push_str(&rest[start..start + OPEN.len() + end + CLOSE.len()]),
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    output.push_str(rest);
    output
}

fn write_file(
    source: &Path,
    destination: &Path,
    parameters: Option<&Parameters>,
) -> InitResult<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            InitError::generation(format!("failed to create {}: {e}", parent.display()))
        })?;
    }

    let bytes = fs::read(source)
        .map_err(|e| InitError::generation(format!("failed to read {}: {e}", source.display())))?;

    let rendered = match (parameters, std::str::from_utf8(&bytes)) {
        (Some(parameters), Ok(text)) if text.contains(OPEN) => Some(substitute(text, parameters)),
        _ => None,
    };

    let result = match rendered {
        Some(text) => fs::write(destination, text),
        None => fs::write(destination, &bytes),
    };
    result.map_err(|e| {
        InitError::generation(format!("failed to write {}: {e}", destination.display()))
    })
}
