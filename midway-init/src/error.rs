//! Error types for a scaffolding run

use thiserror::Error;

/// Result type for scaffolding operations.
pub type InitResult<T> = Result<T, InitError>;

/// Errors that abort a scaffolding run.
///
/// None of these are recovered inside the command; they surface to the
/// binary, which reports them and exits non-zero.
#[derive(Debug, Error)]
pub enum InitError {
    /// The template catalog could not be read or parsed.
    #[error("template catalog unavailable ({location}): {reason}")]
    CatalogUnavailable {
        /// Where the catalog was expected
        location: String,
        /// What went wrong
        reason: String,
    },

    /// `--type` named a template that is not in the catalog.
    #[error("unknown template type '{name}' (available: {available})")]
    UnknownTemplate {
        /// Requested template name
        name: String,
        /// Comma separated catalog names
        available: String,
    },

    /// The generator failed to produce the project.
    #[error("generation failed: {0}")]
    GenerationFailure(String),

    /// The user cancelled a prompt, or the before-submit hook refused it.
    #[error("prompt aborted: {0}")]
    PromptAborted(String),

    /// A prompt handle was run more than once, or no prompt was configured.
    #[error("no pending prompt to run")]
    PromptConsumed,

    /// A prompt primitive answered with a value of the wrong shape.
    #[error("prompt returned an unexpected answer (expected {expected})")]
    UnexpectedAnswer {
        /// Shape the caller expected
        expected: &'static str,
    },

    /// The command was asked to run a second time.
    #[error("command has already run")]
    AlreadyRun,

    /// Command line arguments could not be parsed.
    #[error(transparent)]
    Arguments(#[from] clap::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl InitError {
    /// Build a generation failure from any displayable cause.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailure(message.into())
    }
}

impl From<figment::Error> for InitError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
