//! Command domain - definitions and the registry.

mod definition;
mod registry;

pub use definition::{
    ArgumentParser, CommandDefinition, CommandHandler, FieldMap, ParsedArguments, UsageError,
};
pub use registry::CommandRegistry;
