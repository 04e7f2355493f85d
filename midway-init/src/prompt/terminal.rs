//! Terminal prompts backed by dialoguer

use async_trait::async_trait;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::io::ErrorKind;

use super::{FormField, Prompter};
use crate::error::{InitError, InitResult};
use crate::generator::Parameters;

/// Prompts on the controlling terminal
///
/// dialoguer blocks, so every widget runs on tokio's blocking pool. Hidden
/// prompts (`visible == false`) are not rendered and resolve to their
/// defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    /// Create a terminal prompter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Run a blocking widget off the async runtime
async fn blocking<T, F>(f: F) -> InitResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> InitResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| InitError::PromptAborted(format!("prompt task failed: {e}")))?
}

fn aborted(err: &dialoguer::Error) -> InitError {
    match err {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => {
            InitError::PromptAborted("interrupted".to_string())
        }
        other => InitError::PromptAborted(other.to_string()),
    }
}

fn read_text(message: &str, default: Option<&str>) -> InitResult<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(message);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    input.interact_text().map_err(|e| aborted(&e))
}

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn select(
        &self,
        message: &str,
        choices: &[String],
        default: usize,
        visible: bool,
    ) -> InitResult<String> {
        if choices.is_empty() {
            return Err(InitError::PromptAborted("nothing to choose from".to_string()));
        }
        let default = default.min(choices.len() - 1);
        if !visible {
            return Ok(choices[default].clone());
        }

        let message = message.to_string();
        let choices = choices.to_vec();
        blocking(move || {
            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(&message)
                .items(&choices)
                .default(default)
                .interact_opt()
                .map_err(|e| aborted(&e))?
                .ok_or_else(|| InitError::PromptAborted("selection cancelled".to_string()))?;
            Ok(choices[selection].clone())
        })
        .await
    }

    async fn input(
        &self,
        message: &str,
        default: Option<&str>,
        visible: bool,
    ) -> InitResult<String> {
        if !visible {
            return Ok(default.unwrap_or_default().to_string());
        }

        let message = message.to_string();
        let default = default.map(str::to_string);
        blocking(move || read_text(&message, default.as_deref())).await
    }

    async fn form(
        &self,
        message: &str,
        fields: &[FormField],
        visible: bool,
    ) -> InitResult<Parameters> {
        if !visible {
            return Ok(fields
                .iter()
                .map(|field| (field.name.clone(), field.default.clone()))
                .collect());
        }

        let message = message.to_string();
        let fields = fields.to_vec();
        blocking(move || {
            println!("{}", style(&message).bold());
            let mut values = Parameters::new();
            for field in &fields {
                let value = read_text(&field.message, Some(&field.default))?;
                values.insert(field.name.clone(), value);
            }
            Ok(values)
        })
        .await
    }
}
