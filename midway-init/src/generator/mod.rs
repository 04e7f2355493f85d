//! Generator engine
//!
//! A [`GeneratorHandle`] is bound to exactly one template source and a target
//! directory. It reports the parameters the template declares and renders the
//! project once those are known. The [`GeneratorEngine`] is the factory the
//! command uses to bind handles, so tests can swap the whole filesystem side
//! out.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::InitResult;

pub mod layout;
pub mod local;
pub mod package;

pub use layout::TemplateLayout;
pub use local::LocalGenerator;
pub use package::PackageGenerator;

/// Ordered parameter values, keyed by parameter name
///
/// Keys are unique; iteration follows insertion order, which for collected
/// parameters is the order of the template's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: Vec<(String, String)>,
}

impl Parameters {
    /// Empty parameter set
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Set a value, keeping the original position of an existing key
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// Look up a value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Name/value pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }
        parameters
    }
}

/// One parameter a template declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter key
    pub name: String,
    /// Question shown for this parameter
    pub description: String,
    /// Value used when the user gives none
    pub default: String,
}

/// Parameters a template declares, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSchema {
    parameters: Vec<ParameterSpec>,
}

impl ParameterSchema {
    /// Schema from declared parameters; later duplicates of a name are dropped
    #[must_use]
    pub fn new(parameters: Vec<ParameterSpec>) -> Self {
        let mut unique: Vec<ParameterSpec> = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            if unique.iter().all(|p| p.name != parameter.name) {
                unique.push(parameter);
            }
        }
        Self { parameters: unique }
    }

    /// Declared parameters in order
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter()
    }

    /// Number of declared parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Whether the template declares no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Every parameter at its default value
    #[must_use]
    pub fn defaults(&self) -> Parameters {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect()
    }
}

/// Where a template comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A template directory on the local filesystem
    LocalPath(PathBuf),
    /// An npm package identifier
    Package(String),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "local template {}", path.display()),
            Self::Package(identifier) => write!(f, "package {identifier}"),
        }
    }
}

/// A template source bound to a target directory
#[async_trait]
pub trait GeneratorHandle: Send {
    /// Source this handle renders
    fn source(&self) -> &TemplateSource;

    /// Directory the project is written to
    fn target(&self) -> &Path;

    /// Parameters the template declares
    ///
    /// # Errors
    ///
    /// Returns [`crate::InitError::GenerationFailure`] if the template cannot
    /// be fetched or its manifest is malformed.
    async fn parameter_schema(&mut self) -> InitResult<ParameterSchema>;

    /// Materialize the project
    ///
    /// `None` means no parameters were collected.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InitError::GenerationFailure`] on any fetch, render
    /// or write failure.
    async fn run(&mut self, parameters: Option<Parameters>) -> InitResult<()>;
}

/// Factory for generator handles
pub trait GeneratorEngine: Send + Sync {
    /// Bind a local template directory
    fn define_local_path(&self, template_path: &Path, target_path: &Path)
        -> Box<dyn GeneratorHandle>;

    /// Bind an npm package, fetched with `npm_client`
    fn define_package(
        &self,
        npm_client: &str,
        identifier: &str,
        target_path: &Path,
    ) -> Box<dyn GeneratorHandle>;
}

/// Engine writing to the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsGeneratorEngine;

impl GeneratorEngine for FsGeneratorEngine {
    fn define_local_path(
        &self,
        template_path: &Path,
        target_path: &Path,
    ) -> Box<dyn GeneratorHandle> {
        Box::new(LocalGenerator::new(template_path, target_path))
    }

    fn define_package(
        &self,
        npm_client: &str,
        identifier: &str,
        target_path: &Path,
    ) -> Box<dyn GeneratorHandle> {
        Box::new(PackageGenerator::new(npm_client, identifier, target_path))
    }
}
