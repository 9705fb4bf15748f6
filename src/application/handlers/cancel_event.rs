//! `/calloff` - cancel a scheduled event.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::loaders::ScheduledEventsLoader;
use crate::domain::command::{CommandDefinition, CommandHandler, FieldMap};
use crate::domain::foundation::{ChannelContext, DomainError, ErrorCode, EventId};
use crate::domain::scheduling::EventLock;
use crate::domain::wizard::StepDefinition;
use crate::ports::{ChatChannel, EventRepository, OutboundMessage};

use super::finalize_event::{parse_event_id, parse_event_reference};

/// Builds the `/calloff` command definition.
pub fn cancel_event_command(
    events: Arc<dyn EventRepository>,
    lock: Arc<EventLock>,
    channel: Arc<dyn ChatChannel>,
) -> CommandDefinition {
    CommandDefinition::new(
        "calloff",
        "Cancel a scheduled game",
        parse_event_reference,
        vec![StepDefinition::pick_from_list(
            "event",
            "Which game should I call off?",
            Arc::new(ScheduledEventsLoader::new(Arc::clone(&events))),
        )],
        Arc::new(CancelEventHandler {
            events,
            lock,
            channel,
        }),
    )
}

struct CancelEventHandler {
    events: Arc<dyn EventRepository>,
    lock: Arc<EventLock>,
    channel: Arc<dyn ChatChannel>,
}

impl CancelEventHandler {
    async fn cancel(&self, id: &EventId, ctx: &ChannelContext) -> Result<(), DomainError> {
        let mut event = self
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::EventNotFound, format!("event `{}`", id)))?;
        event.cancel().map_err(|err| {
            DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
        })?;
        self.events.update(&event).await?;
        info!(event = %id, "event cancelled");

        self.channel
            .send(
                ctx,
                OutboundMessage::text(format!("Called off: {}", event.display_line())),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CommandHandler for CancelEventHandler {
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError> {
        let id = parse_event_id(&fields)?;

        if !self.lock.acquire(&id) {
            warn!(event = %id, "cancel skipped, event operation already in flight");
            self.channel
                .send(
                    ctx,
                    OutboundMessage::text("That game is already being processed."),
                )
                .await?;
            return Ok(());
        }

        let outcome = self.cancel(&id, ctx).await;
        self.lock.release(&id);
        outcome
    }
}
