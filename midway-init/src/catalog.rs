//! Template catalog
//!
//! The catalog maps well-known template names to the npm package that
//! provides them. A copy is bundled into the binary; an alternate file can
//! be supplied through configuration.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::{InitError, InitResult};

/// Catalog bundled with the binary
const EMBEDDED_CATALOG: &str = include_str!("../boilerplate.json");

/// Separator between a template name and its description in selection lists
pub const CHOICE_SEPARATOR: &str = " - ";

/// Where the catalog is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The `boilerplate.json` compiled into the binary
    Embedded,
    /// A catalog file on disk
    File(PathBuf),
}

impl CatalogSource {
    fn location(&self) -> String {
        match self {
            Self::Embedded => "embedded boilerplate.json".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// One known template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalogEntry {
    /// Unique catalog key
    pub name: String,
    /// One-line description shown in the selection list
    pub description: String,
    /// Optional author handle
    pub author: Option<String>,
    /// npm package providing the template
    pub package_identifier: String,
}

impl TemplateCatalogEntry {
    /// Text shown for this entry in the selection prompt
    ///
    /// Renders `"<name> - <description>"`, followed by `"(by @<author>)"`
    /// when an author is known.
    #[must_use]
    pub fn display_choice(&self) -> String {
        let mut choice = format!("{}{CHOICE_SEPARATOR}{}", self.name, self.description);
        if let Some(author) = &self.author {
            choice.push_str(&format!("(by @{author})"));
        }
        choice
    }
}

/// Recover the template name from a rendered selection choice
#[must_use]
pub fn template_name_from_choice(choice: &str) -> &str {
    choice
        .split_once(CHOICE_SEPARATOR)
        .map_or(choice, |(name, _)| name)
}

/// On-disk shape of an entry
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(alias = "desc")]
    description: String,
    #[serde(default)]
    author: Option<String>,
    package: String,
}

/// Loaded, read-only template catalog
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    entries: Vec<TemplateCatalogEntry>,
}

impl TemplateCatalog {
    /// Load the catalog from its source
    ///
    /// # Errors
    ///
    /// Returns [`InitError::CatalogUnavailable`] if the resource is missing,
    /// is not valid JSON, has malformed entries, or lists no templates.
    pub fn load(source: &CatalogSource) -> InitResult<Self> {
        let unavailable = |reason: String| InitError::CatalogUnavailable {
            location: source.location(),
            reason,
        };

        let content = match source {
            CatalogSource::Embedded => EMBEDDED_CATALOG.to_string(),
            CatalogSource::File(path) => {
                fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?
            }
        };

        let catalog = Self::parse(&content).map_err(unavailable)?;
        tracing::debug!(
            location = %source.location(),
            templates = catalog.len(),
            "template catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog JSON, keeping the file's key order
    fn parse(content: &str) -> Result<Self, String> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).map_err(|e| e.to_string())?;

        let entries = raw
            .into_iter()
            .map(|(name, value)| {
                let entry: RawEntry = serde_json::from_value(value)
                    .map_err(|e| format!("entry '{name}': {e}"))?;
                Ok(TemplateCatalogEntry {
                    name,
                    description: entry.description,
                    author: entry.author.filter(|a| !a.is_empty()),
                    package_identifier: entry.package,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        if entries.is_empty() {
            return Err("catalog lists no templates".to_string());
        }

        Ok(Self { entries })
    }

    /// Look up an entry by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TemplateCatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Look up an entry, failing with [`InitError::UnknownTemplate`]
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a catalog key.
    pub fn require(&self, name: &str) -> InitResult<&TemplateCatalogEntry> {
        self.get(name).ok_or_else(|| InitError::UnknownTemplate {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    /// Entry names in catalog order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Entries in catalog order
    #[must_use]
    pub fn entries(&self) -> &[TemplateCatalogEntry] {
        &self.entries
    }

    /// Selection prompt choices, one per entry
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(TemplateCatalogEntry::display_choice)
            .collect()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
