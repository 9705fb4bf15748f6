//! `/schedule` - spawn the next occurrence of a template as an event.
//!
//! Full form: `/schedule <template>` where `<template>` is a template name
//! or id. Without arguments, the template is picked from the currently
//! active ones.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::loaders::ActiveTemplatesLoader;
use crate::domain::command::{
    CommandDefinition, CommandHandler, FieldMap, ParsedArguments, UsageError,
};
use crate::domain::foundation::{
    ChannelContext, DomainError, ErrorCode, TemplateId, Timestamp,
};
use crate::domain::scheduling::{ActivityTemplate, ScheduledEvent};
use crate::domain::wizard::{FieldValue, StepDefinition};
use crate::ports::{ChatChannel, EventRepository, OutboundMessage, TemplateRepository};

use super::required_str;

const USAGE: &str = "usage: /schedule [template]";

/// Builds the `/schedule` command definition.
pub fn schedule_event_command(
    templates: Arc<dyn TemplateRepository>,
    events: Arc<dyn EventRepository>,
    channel: Arc<dyn ChatChannel>,
) -> CommandDefinition {
    CommandDefinition::new(
        "schedule",
        "Schedule the next occurrence of a game",
        parse_arguments,
        vec![StepDefinition::pick_from_list(
            "template",
            "Which game should I schedule?",
            Arc::new(ActiveTemplatesLoader::new(Arc::clone(&templates))),
        )],
        Arc::new(ScheduleEventHandler {
            templates,
            events,
            channel,
        }),
    )
}

fn parse_arguments(args: &[String]) -> Result<ParsedArguments, UsageError> {
    match args {
        [] => Ok(ParsedArguments {
            fields: FieldMap::new(),
            missing: vec!["template".to_string()],
        }),
        [template] => Ok(ParsedArguments::complete(FieldMap::from([(
            "template".to_string(),
            FieldValue::String(template.clone()),
        )]))),
        _ => Err(UsageError::new(USAGE)),
    }
}

struct ScheduleEventHandler {
    templates: Arc<dyn TemplateRepository>,
    events: Arc<dyn EventRepository>,
    channel: Arc<dyn ChatChannel>,
}

impl ScheduleEventHandler {
    /// Resolves a template reference: id first, then exact name.
    async fn resolve(&self, reference: &str) -> Result<ActivityTemplate, DomainError> {
        if let Ok(id) = reference.parse::<TemplateId>() {
            if let Some(template) = self.templates.find_by_id(&id).await? {
                return Ok(template);
            }
        }
        self.templates
            .find_by_name(reference)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::TemplateNotFound,
                    format!("no template matches `{}`", reference),
                )
            })
    }
}

#[async_trait]
impl CommandHandler for ScheduleEventHandler {
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError> {
        let reference = required_str(&fields, "template")?;
        let template = self.resolve(reference).await?;

        let starts_at = template.next_occurrence_after(Timestamp::now());
        let event = ScheduledEvent::from_template(&template, starts_at);
        self.events.save(&event).await?;
        info!(event = %event.id(), template = %template.id(), "event scheduled");

        self.channel
            .send(
                ctx,
                OutboundMessage::text(format!("Scheduled: {}", event.display_line())),
            )
            .await?;
        Ok(())
    }
}
