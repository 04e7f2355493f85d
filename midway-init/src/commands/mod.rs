//! CLI command implementations

pub mod init;

pub use init::{InitCommand, RunState, RunSummary, DEFAULT_TARGET_DIR, DIR_MESSAGE};
