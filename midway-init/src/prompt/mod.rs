//! Uniform prompt adapter
//!
//! Three interactive primitives (single-choice select, free-text input and a
//! multi-field form) are exposed through one shape: configure a
//! [`PromptSpec`], get a [`PromptHandle`], run it once for a single
//! [`PromptValue`].
//!
//! Every handle produced by [`configure`] awaits the [`SubmitHook`] before the
//! primitive executes. The composition is an explicit decorator,
//! [`with_before_hook`], so it can be used and tested on its own.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::{InitError, InitResult};
use crate::generator::Parameters;

pub mod terminal;

pub use terminal::DialoguerPrompter;

/// Boxed future resolved by a prompt or a hook
pub type PromptFuture<T> = Pin<Box<dyn Future<Output = InitResult<T>> + Send>>;

/// Single-use prompt execution
pub type PromptRun<T> = Box<dyn FnOnce() -> PromptFuture<T> + Send>;

/// One field of a form prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Key of the resolved value
    pub name: String,
    /// Text shown to the user
    pub message: String,
    /// Value used when the user submits nothing
    pub default: String,
}

/// Primitive-specific part of a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    /// Pick one of several choices
    Select {
        /// Choices in display order
        choices: Vec<String>,
        /// Index preselected
        default: usize,
    },
    /// Free text
    Input {
        /// Initial value
        default: Option<String>,
    },
    /// Several named text fields
    Form {
        /// Fields in display order
        fields: Vec<FormField>,
    },
}

/// Configuration of one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    /// Which primitive and its options
    pub kind: PromptKind,
    /// Question shown to the user
    pub message: String,
    /// Render the prompt; hidden prompts resolve to their defaults
    pub visible: bool,
}

impl PromptSpec {
    /// Single-choice prompt preselecting the first choice
    pub fn select(message: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            kind: PromptKind::Select { choices, default: 0 },
            message: message.into(),
            visible: true,
        }
    }

    /// Free-text prompt
    pub fn input(message: impl Into<String>, default: Option<String>) -> Self {
        Self {
            kind: PromptKind::Input { default },
            message: message.into(),
            visible: true,
        }
    }

    /// Multi-field form prompt
    pub fn form(message: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            kind: PromptKind::Form { fields },
            message: message.into(),
            visible: true,
        }
    }

    /// Set visibility
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Short name of the primitive, for logs
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self.kind {
            PromptKind::Select { .. } => "select",
            PromptKind::Input { .. } => "input",
            PromptKind::Form { .. } => "form",
        }
    }
}

/// Value a prompt resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValue {
    /// Answer of a select or input prompt
    Text(String),
    /// Answers of a form prompt
    Fields(Parameters),
}

impl PromptValue {
    /// Unwrap a text answer
    ///
    /// # Errors
    ///
    /// Returns [`InitError::UnexpectedAnswer`] for form answers.
    pub fn into_text(self) -> InitResult<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Fields(_) => Err(InitError::UnexpectedAnswer { expected: "text" }),
        }
    }

    /// Unwrap form answers
    ///
    /// # Errors
    ///
    /// Returns [`InitError::UnexpectedAnswer`] for text answers.
    pub fn into_fields(self) -> InitResult<Parameters> {
        match self {
            Self::Fields(fields) => Ok(fields),
            Self::Text(_) => Err(InitError::UnexpectedAnswer { expected: "fields" }),
        }
    }
}

/// Interactive primitives
///
/// Implementations block on the user; none of them impose a timeout.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask the user to pick one choice; resolves to the chosen text
    async fn select(
        &self,
        message: &str,
        choices: &[String],
        default: usize,
        visible: bool,
    ) -> InitResult<String>;

    /// Ask for free text
    async fn input(&self, message: &str, default: Option<&str>, visible: bool)
        -> InitResult<String>;

    /// Ask for every field of a form; resolves to field name → value
    async fn form(&self, message: &str, fields: &[FormField], visible: bool)
        -> InitResult<Parameters>;
}

/// Run the primitive a spec describes
///
/// # Errors
///
/// Propagates the primitive's error.
pub async fn dispatch(prompter: &dyn Prompter, spec: &PromptSpec) -> InitResult<PromptValue> {
    match &spec.kind {
        PromptKind::Select { choices, default } => prompter
            .select(&spec.message, choices, *default, spec.visible)
            .await
            .map(PromptValue::Text),
        PromptKind::Input { default } => prompter
            .input(&spec.message, default.as_deref(), spec.visible)
            .await
            .map(PromptValue::Text),
        PromptKind::Form { fields } => prompter
            .form(&spec.message, fields, spec.visible)
            .await
            .map(PromptValue::Fields),
    }
}

/// Lifecycle hook awaited before any prompt resolves
///
/// The default does nothing. Override it to validate, log or adjust state
/// right before a prompt runs; returning an error aborts the prompt and the
/// primitive never executes.
#[async_trait]
pub trait SubmitHook: Send + Sync {
    /// Called once per prompt execution, before the primitive
    async fn before_submit(&self, _spec: &PromptSpec) -> InitResult<()> {
        Ok(())
    }
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl SubmitHook for NoopHook {}

/// Wrap a prompt execution so `hook` is awaited first
///
/// If the hook fails its error is returned and `primitive` is dropped
/// without running.
pub fn with_before_hook<T, H>(primitive: PromptRun<T>, hook: H) -> PromptRun<T>
where
    T: Send + 'static,
    H: FnOnce() -> PromptFuture<()> + Send + 'static,
{
    Box::new(move || {
        Box::pin(async move {
            hook().await?;
            primitive().await
        })
    })
}

/// A configured prompt, runnable once
pub struct PromptHandle {
    spec: PromptSpec,
    run: Option<PromptRun<PromptValue>>,
}

impl PromptHandle {
    /// Handle around an arbitrary execution
    #[must_use]
    pub fn new(spec: PromptSpec, run: PromptRun<PromptValue>) -> Self {
        Self {
            spec,
            run: Some(run),
        }
    }

    /// The configuration this handle was built from
    #[must_use]
    pub const fn spec(&self) -> &PromptSpec {
        &self.spec
    }

    /// Whether the handle has not run yet
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.run.is_some()
    }

    /// Execute the prompt
    ///
    /// # Errors
    ///
    /// Returns [`InitError::PromptConsumed`] on a second call, otherwise
    /// whatever the hook or the primitive returns.
    pub async fn run(&mut self) -> InitResult<PromptValue> {
        let run = self.run.take().ok_or(InitError::PromptConsumed)?;
        tracing::debug!(kind = self.spec.kind_name(), message = %self.spec.message, "running prompt");
        run().await
    }
}

impl fmt::Debug for PromptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptHandle")
            .field("spec", &self.spec)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Build a handle whose execution awaits `hook` before the primitive
#[must_use]
pub fn configure(
    spec: PromptSpec,
    prompter: Arc<dyn Prompter>,
    hook: Arc<dyn SubmitHook>,
) -> PromptHandle {
    let primitive_spec = spec.clone();
    let primitive: PromptRun<PromptValue> = Box::new(move || {
        Box::pin(async move { dispatch(prompter.as_ref(), &primitive_spec).await })
    });

    let hook_spec = spec.clone();
    let run = with_before_hook(primitive, move || {
        Box::pin(async move { hook.before_submit(&hook_spec).await })
    });

    PromptHandle::new(spec, run)
}
