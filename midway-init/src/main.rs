//! midway-init CLI

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use midway_init::{observability, InitArgs, InitCommand, InitConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = InitArgs::parse();
    observability::init()?;

    let config = InitConfig::load().context("Failed to load configuration")?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    InitCommand::new(config).run_with_args(&cwd, args).await?;
    Ok(())
}
