//! Parameter collection
//!
//! A template's schema becomes one form prompt with a field per parameter.
//! Templates that declare nothing are generated without prompting.

use crate::generator::ParameterSchema;
use crate::prompt::{FormField, PromptSpec};

/// Message of the parameter form
pub const FORM_MESSAGE: &str = "Please provide the following information:";

/// Form prompt for a schema, or `None` when the schema is empty
///
/// Fields follow schema order; each field shows the parameter's description
/// and defaults to its declared default.
#[must_use]
pub fn form_prompt(schema: &ParameterSchema) -> Option<PromptSpec> {
    if schema.is_empty() {
        return None;
    }

    let fields = schema
        .iter()
        .map(|parameter| FormField {
            name: parameter.name.clone(),
            message: parameter.description.clone(),
            default: parameter.default.clone(),
        })
        .collect();

    Some(PromptSpec::form(FORM_MESSAGE, fields))
}
