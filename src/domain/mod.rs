//! Domain layer - pure types and rules.

pub mod command;
pub mod foundation;
pub mod scheduling;
pub mod wizard;
