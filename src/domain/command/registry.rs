//! Command registry.
//!
//! Immutable-after-setup lookup table from command name to definition.
//! Built once during bootstrap; duplicate registration is a caller bug,
//! so last write simply wins.

use std::collections::HashMap;
use std::sync::Arc;

use super::CommandDefinition;

/// Lookup table from command name to definition.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<CommandDefinition>>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the mapping for the definition's name.
    pub fn register(&mut self, definition: CommandDefinition) {
        self.commands
            .insert(definition.name().to_string(), Arc::new(definition));
    }

    /// Pure lookup by command name.
    pub fn get(&self, name: &str) -> Option<Arc<CommandDefinition>> {
        self.commands.get(name).cloned()
    }

    /// Registered command names, sorted for stable help output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
