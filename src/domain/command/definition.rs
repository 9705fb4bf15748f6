//! Command definition model.
//!
//! A command pairs an initial-argument parser with the ordered steps needed
//! to fill any fields that parser could not determine from raw input, plus
//! the business handler invoked once all fields are present.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::{ChannelContext, DomainError};
use crate::domain::wizard::{FieldValue, StepDefinition};

/// The assembled field record a command handler receives.
pub type FieldMap = HashMap<String, FieldValue>;

/// Top-level rejection of raw arguments (wrong arity, malformed value).
///
/// Reported immediately to the user with guidance text; no dialog is
/// started for a usage error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    message: String,
}

impl UsageError {
    /// Creates a usage error with user-facing guidance text.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Result of running a command's initial parser over raw arguments.
#[derive(Debug, Clone, Default)]
pub struct ParsedArguments {
    /// Fields the parser could fill from raw arguments.
    pub fields: FieldMap,
    /// Names of fields the parser could not fill; each must have a
    /// matching step in the command definition.
    pub missing: Vec<String>,
}

impl ParsedArguments {
    /// Creates a complete parse result with no missing fields.
    pub fn complete(fields: FieldMap) -> Self {
        Self {
            fields,
            missing: Vec::new(),
        }
    }
}

/// Deterministic, side-effect-free parser over raw command arguments.
pub type ArgumentParser =
    Arc<dyn Fn(&[String]) -> Result<ParsedArguments, UsageError> + Send + Sync>;

/// Business handler invoked with the fully assembled field record.
///
/// May perform arbitrary side effects. Errors are not retried; they
/// propagate to the dispatcher's top-level boundary.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Executes the command.
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError>;
}

/// Immutable pairing of name, parser, steps, and handler.
#[derive(Clone)]
pub struct CommandDefinition {
    name: String,
    description: String,
    parser: ArgumentParser,
    steps: Vec<Arc<StepDefinition>>,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDefinition {
    /// Creates a command definition.
    ///
    /// `steps` order defines the sequence in which missing fields are asked,
    /// and must cover every name the parser can report as missing.
    pub fn new<P>(
        name: impl Into<String>,
        description: impl Into<String>,
        parser: P,
        steps: Vec<StepDefinition>,
        handler: Arc<dyn CommandHandler>,
    ) -> Self
    where
        P: Fn(&[String]) -> Result<ParsedArguments, UsageError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parser: Arc::new(parser),
            steps: steps.into_iter().map(Arc::new).collect(),
            handler,
        }
    }

    /// The command name, without the leading slash.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description for help text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Runs the initial parser over raw arguments.
    pub fn parse(&self, args: &[String]) -> Result<ParsedArguments, UsageError> {
        (self.parser)(args)
    }

    /// The ordered dialog steps.
    pub fn steps(&self) -> &[Arc<StepDefinition>] {
        &self.steps
    }

    /// Locates the step filling `parameter`, if any.
    pub fn step_for(&self, parameter: &str) -> Option<&Arc<StepDefinition>> {
        self.steps.iter().find(|s| s.parameter() == parameter)
    }

    /// The business handler.
    pub fn handler(&self) -> &Arc<dyn CommandHandler> {
        &self.handler
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("steps", &self.steps)
            .finish()
    }
}
