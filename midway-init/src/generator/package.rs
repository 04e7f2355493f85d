//! Generator for a template published as an npm package
//!
//! The package is installed into a scratch directory with the configured npm
//! client, then rendered exactly like a local template.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

use super::local::render_blocking;
use super::{GeneratorHandle, ParameterSchema, Parameters, TemplateLayout, TemplateSource};
use crate::error::{InitError, InitResult};

/// Installed package and the scratch directory holding it
#[derive(Debug)]
struct Fetched {
    _workspace: TempDir,
    layout: TemplateLayout,
}

/// Renders an npm package template into a target directory
#[derive(Debug)]
pub struct PackageGenerator {
    source: TemplateSource,
    npm_client: String,
    identifier: String,
    target: PathBuf,
    fetched: Option<Fetched>,
}

impl PackageGenerator {
    /// Bind package `identifier` to `target`
    #[must_use]
    pub fn new(npm_client: &str, identifier: &str, target: &Path) -> Self {
        Self {
            source: TemplateSource::Package(identifier.to_string()),
            npm_client: npm_client.to_string(),
            identifier: identifier.to_string(),
            target: target.to_path_buf(),
            fetched: None,
        }
    }

    async fn layout(&mut self) -> InitResult<&TemplateLayout> {
        let fetched = match self.fetched.take() {
            Some(fetched) => fetched,
            None => self.fetch().await?,
        };
        Ok(&self.fetched.insert(fetched).layout)
    }

    async fn fetch(&self) -> InitResult<Fetched> {
        let workspace = tempfile::Builder::new()
            .prefix("midway-init-")
            .tempdir()
            .map_err(|e| InitError::generation(format!("failed to create scratch directory: {e}")))?;

        tracing::info!(
            client = %self.npm_client,
            package = %self.identifier,
            "installing template package"
        );

        let output = Command::new(&self.npm_client)
            .arg("install")
            .arg(&self.identifier)
            .arg("--prefix")
            .arg(workspace.path())
            .args(["--no-save", "--no-package-lock", "--no-audit", "--no-fund"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                InitError::generation(format!("failed to start {}: {e}", self.npm_client))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InitError::generation(format!(
                "{} install {} exited with {}: {}",
                self.npm_client,
                self.identifier,
                output.status,
                stderr.trim()
            )));
        }

        let package_dir = workspace
            .path()
            .join("node_modules")
            .join(package_name(&self.identifier));
        let layout = TemplateLayout::read(&package_dir)?;

        Ok(Fetched {
            _workspace: workspace,
            layout,
        })
    }
}

/// Package name of an identifier, without any version or tag suffix
///
/// `@scope/name@^1.2` becomes `@scope/name`; `name@latest` becomes `name`.
#[must_use]
pub fn package_name(identifier: &str) -> &str {
    let search_from = usize::from(identifier.starts_with('@'));
    match identifier[search_from..].find('@') {
        Some(index) => &identifier[..search_from + index],
        None => identifier,
    }
}

#[async_trait]
impl GeneratorHandle for PackageGenerator {
    fn source(&self) -> &TemplateSource {
        &self.source
    }

    fn target(&self) -> &Path {
        &self.target
    }

    async fn parameter_schema(&mut self) -> InitResult<ParameterSchema> {
        Ok(self.layout().await?.schema().clone())
    }

    async fn run(&mut self, parameters: Option<Parameters>) -> InitResult<()> {
        let layout = self.layout().await?.clone();
        let written = render_blocking(layout, self.target.clone(), parameters).await?;
        tracing::info!(
            package = %self.identifier,
            target = %self.target.display(),
            files = written,
            "project generated from package"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_strips_versions() {
        assert_eq!(package_name("midway-boilerplate-web"), "midway-boilerplate-web");
        assert_eq!(package_name("midway-boilerplate-web@1.2.3"), "midway-boilerplate-web");
        assert_eq!(package_name("@midwayjs-examples/faas"), "@midwayjs-examples/faas");
        assert_eq!(package_name("@midwayjs-examples/faas@^2"), "@midwayjs-examples/faas");
        assert_eq!(package_name("@"), "@");
    }

    #[tokio::test]
    async fn test_missing_client_is_generation_failure() {
        let output = TempDir::new().unwrap();
        let mut generator = PackageGenerator::new(
            "midway-init-test-client-that-does-not-exist",
            "midway-boilerplate-web",
            &output.path().join("app"),
        );
        assert_eq!(
            generator.source(),
            &TemplateSource::Package("midway-boilerplate-web".to_string())
        );
        assert!(matches!(
            generator.parameter_schema().await,
            Err(InitError::GenerationFailure(_))
        ));
    }
}
