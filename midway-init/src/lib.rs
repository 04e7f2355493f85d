//! Interactive scaffolding for midway projects
//!
//! `midway-init` picks a boilerplate (from the bundled catalog, a local
//! directory or an npm package), asks for a target directory and the
//! template's parameters, then renders the project.
//!
//! ```no_run
//! use midway_init::{InitCommand, InitConfig};
//!
//! # async fn example() -> midway_init::InitResult<()> {
//! let cwd = std::env::current_dir().expect("cwd");
//! let summary = InitCommand::new(InitConfig::load()?)
//!     .run(&cwd, ["midway-init", "--type", "web", "--dir", "demo"])
//!     .await?;
//! println!("created {}", summary.target_path.display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod args;
pub mod catalog;
pub mod collector;
pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod observability;
pub mod paths;
pub mod prompt;
pub mod source;

pub use args::InitArgs;
pub use catalog::{CatalogSource, TemplateCatalog, TemplateCatalogEntry};
pub use commands::{InitCommand, RunState, RunSummary};
pub use config::InitConfig;
pub use error::{InitError, InitResult};
pub use generator::{
    FsGeneratorEngine, GeneratorEngine, GeneratorHandle, ParameterSchema, ParameterSpec,
    Parameters, TemplateSource,
};
pub use prompt::{
    configure, with_before_hook, DialoguerPrompter, FormField, NoopHook, PromptHandle,
    PromptKind, PromptSpec, PromptValue, Prompter, SubmitHook,
};
pub use source::{ResolvedSource, SourceKind};
