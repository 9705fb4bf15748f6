//! Step model for multi-step dialogs.
//!
//! A step is one question within a dialog: either free text (optionally
//! validated by a parse function) or pick-from-list (options produced by a
//! dynamic loader on every presentation).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A collected answer value, merged into the assembled command fields.
pub type FieldValue = serde_json::Value;

/// Parse function for validated free-text steps.
///
/// Returns the parsed value, or a validation error whose message is shown
/// to the user verbatim before the step is asked again.
pub type ParseFn = Arc<dyn Fn(&str) -> Result<FieldValue, StepValidationError> + Send + Sync>;

/// Rejection of one answer by a step's parse function.
///
/// Recoverable: the dialog stays alive and the step is re-asked.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct StepValidationError {
    message: String,
}

impl StepValidationError {
    /// Creates a validation error with a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Returns the user-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to load the options for a pick-from-list step.
#[derive(Debug, Clone, Error)]
#[error("failed to load step options: {0}")]
pub struct OptionsError(pub String);

/// One selectable choice in a pick-from-list step.
///
/// The transport must encode selections so that re-delivery reproduces
/// `value`, not `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Machine value delivered back when the option is chosen.
    pub value: String,
    /// Human-readable text rendered on the button.
    pub label: String,
}

impl SelectOption {
    /// Creates a new option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Loader invoked fresh every time a pick-from-list step is presented.
///
/// Supports context-dependent choices such as "currently active templates".
/// Must be side-effect-free from the dialog's perspective.
#[async_trait]
pub trait OptionsLoader: Send + Sync {
    /// Produces the current list of options.
    async fn load(&self) -> Result<Vec<SelectOption>, OptionsError>;
}

/// The answer kind of a step.
#[derive(Clone)]
pub enum StepKind {
    /// Free text, optionally run through a parse function.
    FreeText { parse: Option<ParseFn> },
    /// Selection from a dynamically loaded list.
    PickFromList { options: Arc<dyn OptionsLoader> },
}

impl fmt::Debug for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::FreeText { parse } => f
                .debug_struct("FreeText")
                .field("validated", &parse.is_some())
                .finish(),
            StepKind::PickFromList { .. } => f.debug_struct("PickFromList").finish(),
        }
    }
}

/// One question in a multi-step dialog, created at process start.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    parameter: String,
    prompt: String,
    kind: StepKind,
}

impl StepDefinition {
    /// Creates a plain free-text step; the raw string is the value.
    pub fn free_text(parameter: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            prompt: prompt.into(),
            kind: StepKind::FreeText { parse: None },
        }
    }

    /// Creates a free-text step whose answers are run through `parse`.
    pub fn validated<F>(
        parameter: impl Into<String>,
        prompt: impl Into<String>,
        parse: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<FieldValue, StepValidationError> + Send + Sync + 'static,
    {
        Self {
            parameter: parameter.into(),
            prompt: prompt.into(),
            kind: StepKind::FreeText {
                parse: Some(Arc::new(parse)),
            },
        }
    }

    /// Creates a pick-from-list step backed by a dynamic loader.
    pub fn pick_from_list(
        parameter: impl Into<String>,
        prompt: impl Into<String>,
        options: Arc<dyn OptionsLoader>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            prompt: prompt.into(),
            kind: StepKind::PickFromList { options },
        }
    }

    /// The field name this step fills in the assembled command input.
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// The question shown to the user.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The answer kind.
    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    /// Parses one raw answer for this step.
    ///
    /// Free-text steps without a parse function accept the raw string as-is,
    /// as do pick-from-list steps (the transport delivers the chosen option's
    /// `value` as raw input).
    pub fn parse_answer(&self, raw: &str) -> Result<FieldValue, StepValidationError> {
        match &self.kind {
            StepKind::FreeText { parse: Some(parse) } => parse(raw),
            StepKind::FreeText { parse: None } | StepKind::PickFromList { .. } => {
                Ok(FieldValue::String(raw.to_string()))
            }
        }
    }
}
