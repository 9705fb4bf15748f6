//! In-memory scheduled event repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::EventId;
use crate::domain::scheduling::{EventStatus, ScheduledEvent};
use crate::ports::{EventRepository, RepositoryError};

/// In-memory implementation of [`EventRepository`].
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, ScheduledEvent>>,
}

impl InMemoryEventStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventStore {
    async fn save(&self, event: &ScheduledEvent) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn update(&self, event: &ScheduledEvent) -> Result<(), RepositoryError> {
        let mut events = self.events.write().await;
        if !events.contains_key(event.id()) {
            return Err(RepositoryError::not_found("event", event.id()));
        }
        events.insert(*event.id(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<ScheduledEvent>, RepositoryError> {
        let events = self.events.read().await;
        Ok(events.get(id).cloned())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledEvent>, RepositoryError> {
        let events = self.events.read().await;
        let mut scheduled: Vec<ScheduledEvent> = events
            .values()
            .filter(|e| e.status() == EventStatus::Scheduled)
            .cloned()
            .collect();
        scheduled.sort_by_key(|e| e.starts_at());
        Ok(scheduled)
    }
}
