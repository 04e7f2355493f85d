//! Template source resolution
//!
//! Arguments select one of four strategies, checked in a fixed order:
//! `--type`, then `--template`, then `--package`, then interactive selection
//! from the catalog. Later flags are ignored when an earlier one is present.

use std::path::{Path, PathBuf};

use crate::args::InitArgs;
use crate::catalog::{template_name_from_choice, TemplateCatalog};
use crate::error::InitResult;
use crate::generator::TemplateSource;
use crate::paths::absolute_from;
use crate::prompt::PromptSpec;

/// Message of the catalog selection prompt
pub const SELECT_MESSAGE: &str = "Hello, traveller.\n  Which template do you like?";

/// How the template source is acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A catalog entry named by `--type`
    CatalogType(String),
    /// A local directory given by `--template`
    LocalPath(PathBuf),
    /// A package identifier given by `--package`
    PackageName(String),
    /// Ask the user to pick a catalog entry
    Interactive,
}

impl SourceKind {
    /// Pick the strategy for a set of arguments
    #[must_use]
    pub fn from_args(args: &InitArgs) -> Self {
        let kind = if let Some(name) = &args.template_type {
            Self::CatalogType(name.clone())
        } else if let Some(path) = &args.template {
            Self::LocalPath(path.clone())
        } else if let Some(identifier) = &args.package {
            Self::PackageName(identifier.clone())
        } else {
            Self::Interactive
        };

        let supplied = [
            args.template_type.is_some(),
            args.template.is_some(),
            args.package.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();
        if supplied > 1 {
            tracing::warn!(
                selected = ?kind,
                "more than one of --type, --template and --package given; using the first"
            );
        }

        kind
    }
}

/// A fully resolved template source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    source: TemplateSource,
    template_name: Option<String>,
}

impl ResolvedSource {
    /// Catalog entry `name`
    ///
    /// # Errors
    ///
    /// Returns [`crate::InitError::UnknownTemplate`] if `name` is not in the
    /// catalog.
    pub fn from_catalog(catalog: &TemplateCatalog, name: &str) -> InitResult<Self> {
        let entry = catalog.require(name)?;
        Ok(Self {
            source: TemplateSource::Package(entry.package_identifier.clone()),
            template_name: Some(entry.name.clone()),
        })
    }

    /// Catalog entry picked from a rendered selection choice
    ///
    /// # Errors
    ///
    /// Returns [`crate::InitError::UnknownTemplate`] if the choice does not
    /// name a catalog entry.
    pub fn from_choice(catalog: &TemplateCatalog, choice: &str) -> InitResult<Self> {
        Self::from_catalog(catalog, template_name_from_choice(choice))
    }

    /// Local template directory, made absolute against `cwd`
    #[must_use]
    pub fn from_local_path(path: &Path, cwd: &Path) -> Self {
        Self {
            source: TemplateSource::LocalPath(absolute_from(path, cwd)),
            template_name: None,
        }
    }

    /// Package identifier used as is
    #[must_use]
    pub fn from_package(identifier: &str) -> Self {
        Self {
            source: TemplateSource::Package(identifier.to_string()),
            template_name: None,
        }
    }

    /// Source to bind a generator to
    #[must_use]
    pub const fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Catalog name, when the source came from the catalog
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.template_name.as_deref()
    }
}

/// Prompt listing every catalog entry
#[must_use]
pub fn selection_prompt(catalog: &TemplateCatalog) -> PromptSpec {
    PromptSpec::select(SELECT_MESSAGE, catalog.choices())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use crate::error::InitError;
    use clap::Parser;

    fn args(argv: &[&str]) -> InitArgs {
        InitArgs::parse_from(std::iter::once("midway-init").chain(argv.iter().copied()))
    }

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::load(&CatalogSource::Embedded).unwrap()
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(
            SourceKind::from_args(&args(&["--package", "p", "--template", "t", "--type", "web"])),
            SourceKind::CatalogType("web".to_string())
        );
        assert_eq!(
            SourceKind::from_args(&args(&["--package", "p", "--template", "t"])),
            SourceKind::LocalPath(PathBuf::from("t"))
        );
        assert_eq!(
            SourceKind::from_args(&args(&["--package", "p"])),
            SourceKind::PackageName("p".to_string())
        );
        assert_eq!(SourceKind::from_args(&args(&[])), SourceKind::Interactive);
    }

    #[test]
    fn test_catalog_type_binds_package() {
        let resolved = ResolvedSource::from_catalog(&catalog(), "web").unwrap();
        assert_eq!(
            resolved.source(),
            &TemplateSource::Package("midway-boilerplate-web".to_string())
        );
        assert_eq!(resolved.template_name(), Some("web"));
    }

    #[test]
    fn test_unknown_catalog_type_fails() {
        let result = ResolvedSource::from_catalog(&catalog(), "spring-boot");
        assert!(matches!(result, Err(InitError::UnknownTemplate { .. })));
    }

    #[test]
    fn test_local_path_resolution() {
        let relative = ResolvedSource::from_local_path(Path::new("./foo"), Path::new("/work"));
        assert_eq!(
            relative.source(),
            &TemplateSource::LocalPath(PathBuf::from("/work/foo"))
        );
        assert_eq!(relative.template_name(), None);

        let absolute = ResolvedSource::from_local_path(Path::new("/abs/foo"), Path::new("/work"));
        assert_eq!(
            absolute.source(),
            &TemplateSource::LocalPath(PathBuf::from("/abs/foo"))
        );
    }

    #[test]
    fn test_package_is_literal() {
        let resolved = ResolvedSource::from_package("@scope/custom@2");
        assert_eq!(
            resolved.source(),
            &TemplateSource::Package("@scope/custom@2".to_string())
        );
    }

    #[test]
    fn test_selection_prompt_lists_catalog() {
        let catalog = catalog();
        let spec = selection_prompt(&catalog);
        assert_eq!(spec.message, SELECT_MESSAGE);
        match spec.kind {
            crate::prompt::PromptKind::Select { choices, default } => {
                assert_eq!(choices.len(), catalog.len());
                assert_eq!(default, 0);
                let resolved = ResolvedSource::from_choice(&catalog, &choices[0]).unwrap();
                assert_eq!(resolved.template_name(), catalog.names().next());
            }
            other => panic!("expected select prompt, got {other:?}"),
        }
    }
}
