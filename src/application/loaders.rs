//! Option loaders for pick-from-list steps.
//!
//! Loaders run fresh on every step presentation, so the choices always
//! reflect the repositories' current contents.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::scheduling::Weekday;
use crate::domain::wizard::{OptionsError, OptionsLoader, SelectOption};
use crate::ports::{EventRepository, TemplateRepository};

/// Static list of the seven weekdays.
#[derive(Debug, Default)]
pub struct WeekdayOptions;

#[async_trait]
impl OptionsLoader for WeekdayOptions {
    async fn load(&self) -> Result<Vec<SelectOption>, OptionsError> {
        Ok(Weekday::all()
            .into_iter()
            .map(|day| SelectOption::new(day.short(), day.full_name()))
            .collect())
    }
}

/// Currently active activity templates, by name.
pub struct ActiveTemplatesLoader {
    templates: Arc<dyn TemplateRepository>,
}

impl ActiveTemplatesLoader {
    pub fn new(templates: Arc<dyn TemplateRepository>) -> Self {
        Self { templates }
    }
}

#[async_trait]
impl OptionsLoader for ActiveTemplatesLoader {
    async fn load(&self) -> Result<Vec<SelectOption>, OptionsError> {
        let active = self
            .templates
            .list_active()
            .await
            .map_err(|err| OptionsError(err.to_string()))?;
        Ok(active
            .iter()
            .map(|template| {
                SelectOption::new(
                    template.id().to_string(),
                    format!(
                        "{} ({} {})",
                        template.name(),
                        template.weekday(),
                        template.start_time()
                    ),
                )
            })
            .collect())
    }
}

/// Events still open for finalize/cancel, soonest first.
pub struct ScheduledEventsLoader {
    events: Arc<dyn EventRepository>,
}

impl ScheduledEventsLoader {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl OptionsLoader for ScheduledEventsLoader {
    async fn load(&self) -> Result<Vec<SelectOption>, OptionsError> {
        let scheduled = self
            .events
            .list_scheduled()
            .await
            .map_err(|err| OptionsError(err.to_string()))?;
        Ok(scheduled
            .iter()
            .map(|event| SelectOption::new(event.id().to_string(), event.display_line()))
            .collect())
    }
}
