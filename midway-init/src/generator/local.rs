//! Generator for a template directory on disk

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{GeneratorHandle, ParameterSchema, Parameters, TemplateLayout, TemplateSource};
use crate::error::{InitError, InitResult};

/// Renders a local template directory into a target directory
#[derive(Debug)]
pub struct LocalGenerator {
    source: TemplateSource,
    template_path: PathBuf,
    target: PathBuf,
    layout: Option<TemplateLayout>,
}

impl LocalGenerator {
    /// Bind `template_path` to `target`
    #[must_use]
    pub fn new(template_path: &Path, target: &Path) -> Self {
        Self {
            source: TemplateSource::LocalPath(template_path.to_path_buf()),
            template_path: template_path.to_path_buf(),
            target: target.to_path_buf(),
            layout: None,
        }
    }

    fn layout(&mut self) -> InitResult<&TemplateLayout> {
        let layout = match self.layout.take() {
            Some(layout) => layout,
            None => TemplateLayout::read(&self.template_path)?,
        };
        Ok(&*self.layout.insert(layout))
    }
}

/// Render on the blocking pool
pub(super) async fn render_blocking(
    layout: TemplateLayout,
    target: PathBuf,
    parameters: Option<Parameters>,
) -> InitResult<usize> {
    tokio::task::spawn_blocking(move || layout.render(&target, parameters.as_ref()))
        .await
        .map_err(|e| InitError::generation(format!("render task failed: {e}")))?
}

#[async_trait]
impl GeneratorHandle for LocalGenerator {
    fn source(&self) -> &TemplateSource {
        &self.source
    }

    fn target(&self) -> &Path {
        &self.target
    }

    async fn parameter_schema(&mut self) -> InitResult<ParameterSchema> {
        Ok(self.layout()?.schema().clone())
    }

    async fn run(&mut self, parameters: Option<Parameters>) -> InitResult<()> {
        let layout = self.layout()?.clone();
        let written = render_blocking(layout, self.target.clone(), parameters).await?;
        tracing::info!(
            template = %self.template_path.display(),
            target = %self.target.display(),
            files = written,
            "project generated from local template"
        );
        Ok(())
    }
}
