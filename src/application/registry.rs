//! Command catalogue assembly.
//!
//! Builds the full command registry from a shared set of dependencies.
//! Registration happens once during bootstrap; the registry is immutable
//! afterwards.

use std::sync::Arc;

use crate::domain::command::CommandRegistry;
use crate::domain::scheduling::EventLock;
use crate::ports::{ChatChannel, EventRepository, TemplateRepository};

use super::handlers::{
    cancel_event_command, create_template_command, finalize_event_command, schedule_event_command,
    split_cost_command,
};

/// Everything the command handlers need, shared across the catalogue.
#[derive(Clone)]
pub struct CommandDependencies {
    pub templates: Arc<dyn TemplateRepository>,
    pub events: Arc<dyn EventRepository>,
    pub lock: Arc<EventLock>,
    pub channel: Arc<dyn ChatChannel>,
}

/// Builds the registry with every command the assistant understands.
pub fn build_registry(deps: &CommandDependencies) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(create_template_command(
        Arc::clone(&deps.templates),
        Arc::clone(&deps.channel),
    ));
    registry.register(schedule_event_command(
        Arc::clone(&deps.templates),
        Arc::clone(&deps.events),
        Arc::clone(&deps.channel),
    ));
    registry.register(finalize_event_command(
        Arc::clone(&deps.events),
        Arc::clone(&deps.lock),
        Arc::clone(&deps.channel),
    ));
    registry.register(cancel_event_command(
        Arc::clone(&deps.events),
        Arc::clone(&deps.lock),
        Arc::clone(&deps.channel),
    ));
    registry.register(split_cost_command(Arc::clone(&deps.channel)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingChannel;
    use crate::adapters::memory::{InMemoryEventStore, InMemoryTemplateStore};

    fn deps() -> CommandDependencies {
        CommandDependencies {
            templates: Arc::new(InMemoryTemplateStore::new()),
            events: Arc::new(InMemoryEventStore::new()),
            lock: Arc::new(EventLock::new()),
            channel: Arc::new(RecordingChannel::new()),
        }
    }

    #[test]
    fn registry_contains_the_full_catalogue() {
        let registry = build_registry(&deps());
        assert_eq!(
            registry.names(),
            vec!["calloff", "gameon", "newgame", "schedule", "split"]
        );
    }

    #[test]
    fn every_missing_field_has_a_step() {
        // A parser-reported field without a matching step fails at runtime,
        // so check the pairing here for every command.
        let registry = build_registry(&deps());
        for name in registry.names() {
            let command = registry.get(name).unwrap();
            let parsed = command.parse(&[]).unwrap();
            for field in &parsed.missing {
                assert!(
                    command.step_for(field).is_some(),
                    "command `{}` has no step for `{}`",
                    name,
                    field
                );
            }
        }
    }
}
