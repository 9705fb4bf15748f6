//! Command business handlers.
//!
//! Each handler receives the fully assembled field record from the
//! orchestrator and performs the command's side effects.

mod cancel_event;
mod create_template;
mod finalize_event;
mod schedule_event;
mod split_cost;

pub use cancel_event::cancel_event_command;
pub use create_template::create_template_command;
pub use finalize_event::finalize_event_command;
pub use schedule_event::schedule_event_command;
pub use split_cost::split_cost_command;

use crate::domain::command::FieldMap;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::wizard::FieldValue;

/// Reads a string field the orchestrator guaranteed to be present.
pub(crate) fn required_str<'a>(fields: &'a FieldMap, name: &str) -> Result<&'a str, DomainError> {
    fields
        .get(name)
        .and_then(FieldValue::as_str)
        .ok_or_else(|| assembly_error(name))
}

/// Reads a numeric field the orchestrator guaranteed to be present.
pub(crate) fn required_u64(fields: &FieldMap, name: &str) -> Result<u64, DomainError> {
    fields
        .get(name)
        .and_then(FieldValue::as_u64)
        .ok_or_else(|| assembly_error(name))
}

fn assembly_error(name: &str) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("assembled command input is missing field `{}`", name),
    )
}
