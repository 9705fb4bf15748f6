//! `/newgame` - create a recurring activity template.
//!
//! Full form: `/newgame <name> <weekday> <HH:MM> <courts>`. Any missing
//! tail arguments are collected conversationally.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::application::loaders::WeekdayOptions;
use crate::domain::command::{
    CommandDefinition, CommandHandler, FieldMap, ParsedArguments, UsageError,
};
use crate::domain::foundation::{ChannelContext, DomainError};
use crate::domain::scheduling::{parse_start_time, ActivityTemplate, Weekday, MAX_COURTS};
use crate::domain::wizard::{FieldValue, StepDefinition, StepValidationError};
use crate::ports::{ChatChannel, OutboundMessage, TemplateRepository};

use super::{required_str, required_u64};

const USAGE: &str = "usage: /newgame <name> <weekday> <HH:MM> <courts>";

/// Builds the `/newgame` command definition.
pub fn create_template_command(
    templates: Arc<dyn TemplateRepository>,
    channel: Arc<dyn ChatChannel>,
) -> CommandDefinition {
    CommandDefinition::new(
        "newgame",
        "Create a recurring game",
        parse_arguments,
        vec![
            StepDefinition::validated("name", "What should the game be called?", parse_name),
            StepDefinition::pick_from_list(
                "weekday",
                "Which day of the week?",
                Arc::new(WeekdayOptions),
            ),
            StepDefinition::validated(
                "start_time",
                "What time does play start? (HH:MM)",
                parse_time,
            ),
            StepDefinition::validated(
                "courts",
                format!("How many courts? (1-{})", MAX_COURTS),
                parse_courts,
            ),
        ],
        Arc::new(CreateTemplateHandler { templates, channel }),
    )
}

/// Positional parse of `<name> <weekday> <HH:MM> <courts>`; absent tail
/// positions become missing fields, malformed present ones are usage errors.
fn parse_arguments(args: &[String]) -> Result<ParsedArguments, UsageError> {
    if args.len() > 4 {
        return Err(UsageError::new(USAGE));
    }
    let mut parsed = ParsedArguments::default();

    match args.first() {
        Some(name) => {
            let value = parse_name(name).map_err(|err| UsageError::new(err.message()))?;
            parsed.fields.insert("name".to_string(), value);
        }
        None => parsed.missing.push("name".to_string()),
    }
    match args.get(1) {
        Some(raw) => {
            let weekday: Weekday = raw
                .parse()
                .map_err(|err: crate::domain::foundation::ValidationError| {
                    UsageError::new(err.to_string())
                })?;
            parsed.fields.insert(
                "weekday".to_string(),
                FieldValue::String(weekday.short().to_string()),
            );
        }
        None => parsed.missing.push("weekday".to_string()),
    }
    match args.get(2) {
        Some(raw) => {
            let value = parse_time(raw).map_err(|err| UsageError::new(err.message()))?;
            parsed.fields.insert("start_time".to_string(), value);
        }
        None => parsed.missing.push("start_time".to_string()),
    }
    match args.get(3) {
        Some(raw) => {
            let value = parse_courts(raw).map_err(|err| UsageError::new(err.message()))?;
            parsed.fields.insert("courts".to_string(), value);
        }
        None => parsed.missing.push("courts".to_string()),
    }

    Ok(parsed)
}

fn parse_name(raw: &str) -> Result<FieldValue, StepValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StepValidationError::new("The name cannot be empty."));
    }
    Ok(FieldValue::String(name.to_string()))
}

fn parse_time(raw: &str) -> Result<FieldValue, StepValidationError> {
    parse_start_time(raw)
        .map(|_| FieldValue::String(raw.trim().to_string()))
        .map_err(|_| StepValidationError::new("Please send a time like 21:00."))
}

fn parse_courts(raw: &str) -> Result<FieldValue, StepValidationError> {
    let courts: u8 = raw
        .trim()
        .parse()
        .map_err(|_| StepValidationError::new("Please send a number of courts."))?;
    if courts == 0 || courts > MAX_COURTS {
        return Err(StepValidationError::new(format!(
            "Courts must be between 1 and {}.",
            MAX_COURTS
        )));
    }
    Ok(FieldValue::from(courts))
}

struct CreateTemplateHandler {
    templates: Arc<dyn TemplateRepository>,
    channel: Arc<dyn ChatChannel>,
}

#[async_trait]
impl CommandHandler for CreateTemplateHandler {
    async fn execute(&self, fields: FieldMap, ctx: &ChannelContext) -> Result<(), DomainError> {
        let name = required_str(&fields, "name")?;
        let weekday: Weekday = required_str(&fields, "weekday")?.parse()?;
        let start_time = required_str(&fields, "start_time")?;
        let courts = required_u64(&fields, "courts")? as u8;

        let template = ActivityTemplate::new(name, weekday, start_time, courts)?;
        self.templates.save(&template).await?;
        info!(template = %template.id(), name = template.name(), "template created");

        self.channel
            .send(
                ctx,
                OutboundMessage::text(format!(
                    "Created {}: {} at {}, {} court{}.",
                    template.name(),
                    template.weekday(),
                    template.start_time(),
                    template.courts(),
                    if template.courts() == 1 { "" } else { "s" },
                )),
            )
            .await?;
        Ok(())
    }
}
