//! EventRepository port - persistence for scheduled events.

use async_trait::async_trait;

use crate::domain::foundation::EventId;
use crate::domain::scheduling::ScheduledEvent;

use super::RepositoryError;

/// Repository port for scheduled event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Saves a new event.
    async fn save(&self, event: &ScheduledEvent) -> Result<(), RepositoryError>;

    /// Updates an existing event.
    ///
    /// # Errors
    ///
    /// `NotFound` if the event does not exist.
    async fn update(&self, event: &ScheduledEvent) -> Result<(), RepositoryError>;

    /// Finds an event by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &EventId) -> Result<Option<ScheduledEvent>, RepositoryError>;

    /// Lists events still in the `Scheduled` state, soonest first.
    async fn list_scheduled(&self) -> Result<Vec<ScheduledEvent>, RepositoryError>;
}
