//! `/gameon` - finalize a scheduled event.
//!
//! Guarded by the per-event advisory lock: a duplicate tap that arrives
//! while the first finalize is still running aborts with a busy message
//! instead of double-processing.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::loaders::ScheduledEventsLoader;
use crate::domain::command::{
    CommandDefinition, CommandHandler, FieldMap, ParsedArguments, UsageError,
};
use crate::domain::foundation::{ChannelContext, DomainError, ErrorCode, EventId};
use crate::domain::scheduling::EventLock;
use crate::domain::wizard::{FieldValue, StepDefinition};
use crate::ports::{ChatChannel, EventRepository, OutboundMessage};

use super::required_str;

const USAGE: &str = "usage: /gameon [event]";

/// Builds the `/gameon` command definition.
pub fn finalize_event_command(
    events: Arc<dyn EventRepository>,
    lock: Arc<EventLock>,
    channel: Arc<dyn ChatChannel>,
) -> CommandDefinition {
    CommandDefinition::new(
        "gameon",
        "Finalize a scheduled game",
        parse_event_reference,
        vec![StepDefinition::pick_from_list(
            "event",
            "Which game is on?",
            Arc::new(ScheduledEventsLoader::new(Arc::clone(&events))),
        )],
        Arc::new(FinalizeEventHandler {
            events,
            lock,
            channel,
        }),
    )
}

/// Shared by `/gameon` and `/calloff`: zero or one event reference.
pub(super) fn parse_event_reference(args: &[String]) -> Result<ParsedArguments, UsageError> {
    match args {
        [] => Ok(ParsedArguments {
            fields: FieldMap::new(),
            missing: vec!["event".to_string()],
        }),
        [event] => Ok(ParsedArguments::complete(FieldMap::from([(
            "event".to_string(),
            FieldValue::String(event.clone()),
        )]))),
        _ => Err(UsageError::new(USAGE)),
    }
}

/// Parses the collected event reference into an id.
pub(super) fn parse_event_id(fields: &FieldMap) -> Result<EventId, DomainError> {
    let reference = required_str(fields, "event")?;
    reference.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("`{}` is not an event id", reference),
        )
    })
}

struct FinalizeEventHandler {
    events: Arc<dyn EventRepository>,
    lock: Arc<EventLock>,
    channel: Arc<dyn ChatChannel>,
}

impl FinalizeEventHandler {
    async fn finalize(&self, id: &EventId, ctx: &ChannelContext) -> Result<(), DomainError> {
        let mut event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::EventNotFound, format!("event `{}`", id)))?;
        event.finalize().map_err(|err| {
            DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
        })?;
        self.events.update(&event).await?;
        info!(event = %id, "event finalized");

        self.channel
            .send(
                ctx,
                OutboundMessage::text(format!("Game on! {}", event.display_line())),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for FinalizeEventHandler {
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError> {
        let id = parse_event_id(&fields)?;

        if !self.lock.acquire(&id) {
            warn!(event = %id, "finalize skipped, event operation already in flight");
            self.channel
                .send(
                    ctx,
                    OutboundMessage::text("That game is already being processed."),
                )
                .await?;
            return Ok(());
        }

        let outcome = self.finalize(&id, ctx).await;
        self.lock.release(&id);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingChannel;
    use crate::adapters::memory::InMemoryEventStore;
    use crate::domain::foundation::{ChatId, Timestamp, UserId};
    use crate::domain::scheduling::{ActivityTemplate, EventStatus, ScheduledEvent, Weekday};

    fn ctx() -> ChannelContext {
        ChannelContext::new(UserId::new("u1").unwrap(), ChatId::new("lobby").unwrap())
    }

    fn fields_for(id: &EventId) -> FieldMap {
        FieldMap::from([("event".to_string(), FieldValue::String(id.to_string()))])
    }

    struct Harness {
        events: Arc<InMemoryEventStore>,
        lock: Arc<EventLock>,
        channel: Arc<RecordingChannel>,
        handler: FinalizeEventHandler,
    }

    fn harness() -> Harness {
        let events = Arc::new(InMemoryEventStore::new());
        let lock = Arc::new(EventLock::new());
        let channel = Arc::new(RecordingChannel::new());
        let handler = FinalizeEventHandler {
            events: Arc::clone(&events) as _,
            lock: Arc::clone(&lock),
            channel: Arc::clone(&channel) as _,
        };
        Harness {
            events,
            lock,
            channel,
            handler,
        }
    }

    async fn seed_event(events: &InMemoryEventStore) -> ScheduledEvent {
        let template = ActivityTemplate::new("Padel", Weekday::Tue, "21:00", 2).unwrap();
        let event = ScheduledEvent::from_template(&template, Timestamp::now().add_days(1));
        events.save(&event).await.unwrap();
        event
    }

    #[tokio::test]
    async fn finalizes_a_scheduled_event() {
        let h = harness();
        let event = seed_event(&h.events).await;

        h.handler.execute(fields_for(event.id()), &ctx()).await.unwrap();

        let stored = h.events.find_by_id(event.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), EventStatus::Finalized);
        assert!(h.channel.contains_text("Game on!"));
        assert!(!h.lock.is_held(event.id()));
    }

    #[tokio::test]
    async fn busy_event_aborts_without_processing() {
        let h = harness();
        let event = seed_event(&h.events).await;

        // Simulate a concurrent operation holding the lock.
        assert!(h.lock.acquire(event.id()));
        h.handler.execute(fields_for(event.id()), &ctx()).await.unwrap();

        let stored = h.events.find_by_id(event.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), EventStatus::Scheduled);
        assert!(h.channel.contains_text("already being processed"));
        // The busy path must not release the other operation's lock.
        assert!(h.lock.is_held(event.id()));
    }

    #[tokio::test]
    async fn already_finalized_event_fails_and_releases_lock() {
        let h = harness();
        let mut event = seed_event(&h.events).await;
        event.finalize().unwrap();
        h.events.update(&event).await.unwrap();

        let err = h
            .handler
            .execute(fields_for(event.id()), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(!h.lock.is_held(event.id()));
    }

    #[tokio::test]
    async fn unknown_event_fails_and_releases_lock() {
        let h = harness();
        let id = EventId::new();

        let err = h.handler.execute(fields_for(&id), &ctx()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EventNotFound);
        assert!(!h.lock.is_held(&id));
    }

    #[tokio::test]
    async fn garbage_event_reference_is_rejected() {
        let h = harness();
        let fields =
            FieldMap::from([("event".to_string(), FieldValue::String("nope".to_string()))]);
        let err = h.handler.execute(fields, &ctx()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
