//! Concrete scheduled events spawned from activity templates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, StateMachine, TemplateId, Timestamp, ValidationError};

use super::ActivityTemplate;

/// Lifecycle state of a scheduled event.
///
/// `Scheduled` is the only non-terminal state: an event is either finalized
/// (attendance closed, game on) or cancelled, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Spawned and open for attendance.
    #[default]
    Scheduled,

    /// Confirmed to happen; no further changes.
    Finalized,

    /// Called off; no further changes.
    Cancelled,
}

impl StateMachine for EventStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EventStatus::*;
        matches!((self, target), (Scheduled, Finalized) | (Scheduled, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EventStatus::*;
        match self {
            Scheduled => vec![Finalized, Cancelled],
            Finalized | Cancelled => vec![],
        }
    }
}

/// One concrete occurrence of a recurring activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    id: EventId,
    template_id: TemplateId,
    name: String,
    starts_at: Timestamp,
    courts: u8,
    status: EventStatus,
}

impl ScheduledEvent {
    /// Spawns an event from a template for a concrete start time.
    pub fn from_template(template: &ActivityTemplate, starts_at: Timestamp) -> Self {
        Self {
            id: EventId::new(),
            template_id: *template.id(),
            name: template.name().to_string(),
            starts_at,
            courts: template.courts(),
            status: EventStatus::Scheduled,
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    pub fn courts(&self) -> u8 {
        self.courts
    }

    pub fn status(&self) -> EventStatus {
        self.status
    }

    /// Confirms the event will happen.
    pub fn finalize(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(EventStatus::Finalized)?;
        Ok(())
    }

    /// Calls the event off.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(EventStatus::Cancelled)?;
        Ok(())
    }

    /// One-line summary for chat display.
    pub fn display_line(&self) -> String {
        format!(
            "{} on {} ({} court{})",
            self.name,
            self.starts_at.display_short(),
            self.courts,
            if self.courts == 1 { "" } else { "s" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::Weekday;

    fn event() -> ScheduledEvent {
        let template = ActivityTemplate::new("Padel", Weekday::Tue, "21:00", 2).unwrap();
        ScheduledEvent::from_template(&template, Timestamp::now().add_days(2))
    }

    #[test]
    fn spawned_event_copies_template_details() {
        let template = ActivityTemplate::new("Padel", Weekday::Tue, "21:00", 2).unwrap();
        let starts_at = Timestamp::now().add_days(2);
        let event = ScheduledEvent::from_template(&template, starts_at);

        assert_eq!(event.template_id(), template.id());
        assert_eq!(event.name(), "Padel");
        assert_eq!(event.courts(), 2);
        assert_eq!(event.starts_at(), starts_at);
        assert_eq!(event.status(), EventStatus::Scheduled);
    }

    #[test]
    fn finalize_moves_to_terminal_state() {
        let mut event = event();
        event.finalize().unwrap();
        assert_eq!(event.status(), EventStatus::Finalized);
        assert!(event.status().is_terminal());
    }

    #[test]
    fn cancel_moves_to_terminal_state() {
        let mut event = event();
        event.cancel().unwrap();
        assert_eq!(event.status(), EventStatus::Cancelled);
    }

    #[test]
    fn finalized_event_cannot_be_cancelled() {
        let mut event = event();
        event.finalize().unwrap();
        assert!(event.cancel().is_err());
    }

    #[test]
    fn cancelled_event_cannot_be_finalized() {
        let mut event = event();
        event.cancel().unwrap();
        assert!(event.finalize().is_err());
    }

    #[test]
    fn display_line_pluralizes_courts() {
        let template = ActivityTemplate::new("Padel", Weekday::Tue, "21:00", 1).unwrap();
        let event = ScheduledEvent::from_template(&template, Timestamp::now());
        assert!(event.display_line().contains("1 court)"));
    }
}
