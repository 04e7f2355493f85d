//! Configuration for midway-init
//!
//! Settings are layered with the following precedence (highest first):
//!
//! 1. Command line flags (`--npm-client`, `--catalog`, `--yes`)
//! 2. Environment variables (`MIDWAY_INIT_` prefix, e.g. `MIDWAY_INIT_NPM_CLIENT=pnpm`)
//! 3. `./midway-init.toml`
//! 4. `~/.config/midway-init/config.toml` (XDG)
//! 5. `/etc/midway-init/config.toml`
//! 6. Hardcoded defaults
//!
//! # Example Configuration
//!
//! ```toml
//! npm_client = "pnpm"
//! catalog_path = "/opt/templates/boilerplate.json"
//! interactive = true
//! countdown_tick_ms = 1000
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::args::InitArgs;
use crate::catalog::CatalogSource;
use crate::error::InitResult;
use crate::paths::absolute_from;

/// Environment variable prefix
const ENV_PREFIX: &str = "MIDWAY_INIT_";

/// Project-local configuration file
const LOCAL_CONFIG: &str = "midway-init.toml";

/// Runtime settings for a scaffolding run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    /// npm-compatible client used to fetch package templates
    pub npm_client: String,

    /// Alternate catalog file; the bundled catalog is used when unset
    pub catalog_path: Option<PathBuf>,

    /// Show prompts; when false every prompt resolves to its default
    pub interactive: bool,

    /// Delay between countdown ticks before generation
    pub countdown_tick_ms: u64,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            npm_client: "npm".to_string(),
            catalog_path: None,
            interactive: true,
            countdown_tick_ms: 1000,
        }
    }
}

impl InitConfig {
    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is malformed or a value has
    /// the wrong type.
    pub fn load() -> InitResult<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let system_config = PathBuf::from("/etc/midway-init/config.toml");
        if system_config.exists() {
            figment = figment.merge(Toml::file(&system_config));
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                figment = figment.merge(Toml::file(&user_config));
            }
        }

        figment = figment
            .merge(Toml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX));

        Ok(figment.extract()?)
    }

    /// XDG user configuration file
    fn user_config_path() -> Option<PathBuf> {
        let base = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg)
        } else {
            PathBuf::from(std::env::var("HOME").ok()?).join(".config")
        };
        Some(base.join("midway-init").join("config.toml"))
    }

    /// Apply command line overrides
    #[must_use]
    pub fn with_args(mut self, args: &InitArgs) -> Self {
        if let Some(client) = &args.npm_client {
            self.npm_client.clone_from(client);
        }
        if let Some(catalog) = &args.catalog {
            self.catalog_path = Some(catalog.clone());
        }
        if args.yes {
            self.interactive = false;
        }
        self
    }

    /// Where the template catalog is read from
    ///
    /// A relative `catalog_path` is resolved against `cwd`.
    #[must_use]
    pub fn catalog_source(&self, cwd: &Path) -> CatalogSource {
        self.catalog_path
            .as_deref()
            .map_or(CatalogSource::Embedded, |path| {
                CatalogSource::File(absolute_from(path, cwd))
            })
    }

    /// Countdown tick as a duration
    #[must_use]
    pub const fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }
}
