//! Wizard domain - the step model for interactive command completion.
//!
//! The effectful engine that drives these steps lives in
//! `application::wizard`; this module holds the pure vocabulary.

mod error;
mod step;

pub use error::WizardError;
pub use step::{
    FieldValue, OptionsError, OptionsLoader, ParseFn, SelectOption, StepDefinition, StepKind,
    StepValidationError,
};
