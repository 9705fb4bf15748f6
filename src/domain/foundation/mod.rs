//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the matchday domain.

mod context;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use context::ChannelContext;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChatId, EventId, TemplateId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
