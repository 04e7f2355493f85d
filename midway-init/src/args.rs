//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::error::InitResult;

/// Create a new midway project from a boilerplate
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "midway-init")]
#[command(version)]
#[command(about = "Create a new midway project from a boilerplate", long_about = None)]
pub struct InitArgs {
    /// Directory where the boilerplate should be created
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Catalog template name (e.g. `web`)
    #[arg(long = "type", value_name = "NAME")]
    pub template_type: Option<String>,

    /// Local template directory
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// npm package to use as the template, bypassing the catalog
    #[arg(long, value_name = "IDENTIFIER")]
    pub package: Option<String>,

    /// npm-compatible client used to fetch package templates
    #[arg(long, value_name = "BIN")]
    pub npm_client: Option<String>,

    /// Alternate catalog file
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Accept the default answer for every prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl InitArgs {
    /// Parse an argument vector (the first element is the program name)
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or missing values.
    pub fn try_parse_argv<I, T>(argv: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::try_parse_from(argv)?)
    }
}
