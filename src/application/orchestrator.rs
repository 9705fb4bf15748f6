//! Command orchestrator.
//!
//! Ties parsing, missing-field detection, and step-by-step collection
//! together: runs a command's initial parser, drives the wizard engine
//! through each missing field in declared step order, then invokes the
//! business handler with the fully assembled input.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::command::CommandDefinition;
use crate::domain::foundation::{ChannelContext, DomainError};
use crate::domain::wizard::WizardError;
use crate::ports::{ChannelError, ChatChannel, OutboundMessage};

use super::wizard::WizardEngine;

/// Failures surfaced by a command run.
///
/// A cancelled dialog is not among them: cancellation aborts the run
/// silently and successfully.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The parser reported a missing field the command has no step for.
    /// A configuration error: fail fast, never silently skip.
    #[error("command `{command}` reports missing field `{field}` but defines no step for it")]
    MissingStep { command: String, field: String },

    /// The business handler failed after full assembly.
    #[error("handler failed: {0}")]
    Handler(#[source] DomainError),

    /// Outbound send failed while reporting to the user.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The wizard refused to start a dialog (already active for this user).
    #[error(transparent)]
    Wizard(WizardError),
}

/// Runs registered commands to completion.
pub struct CommandOrchestrator {
    wizard: Arc<WizardEngine>,
    channel: Arc<dyn ChatChannel>,
}

impl CommandOrchestrator {
    /// Creates an orchestrator.
    pub fn new(wizard: Arc<WizardEngine>, channel: Arc<dyn ChatChannel>) -> Self {
        Self { wizard, channel }
    }

    /// Runs one command invocation to completion.
    ///
    /// A top-level usage error is rendered to the user and ends the run
    /// without starting a wizard. Missing fields are collected through the
    /// wizard in the order the command's steps declare them; if the dialog
    /// is cancelled or times out, the run stops silently and the handler is
    /// never invoked. Each field is asked exactly once per run - re-prompts
    /// on invalid input happen inside the wizard engine.
    pub async fn run(
        &self,
        command: &CommandDefinition,
        raw_args: &[String],
        ctx: &ChannelContext,
    ) -> Result<(), OrchestratorError> {
        let parsed = match command.parse(raw_args) {
            Ok(parsed) => parsed,
            Err(usage) => {
                self.channel
                    .send(ctx, OutboundMessage::text(usage.to_string()))
                    .await?;
                return Ok(());
            }
        };

        let mut fields = parsed.fields;
        let missing = parsed.missing;

        if !missing.is_empty() {
            for field in &missing {
                if command.step_for(field).is_none() {
                    return Err(OrchestratorError::MissingStep {
                        command: command.name().to_string(),
                        field: field.clone(),
                    });
                }
            }

            // Declared step order is authoritative, not the order the
            // parser reported the missing names in.
            for step in command
                .steps()
                .iter()
                .filter(|step| missing.iter().any(|m| m == step.parameter()))
            {
                match self.wizard.collect(Arc::clone(step), ctx).await {
                    Ok(value) => {
                        fields.insert(step.parameter().to_string(), value);
                    }
                    Err(WizardError::Cancelled) => {
                        debug!(
                            command = command.name(),
                            step = step.parameter(),
                            "dialog ended without an answer, aborting command"
                        );
                        return Ok(());
                    }
                    Err(err) => return Err(OrchestratorError::Wizard(err)),
                }
            }
        }

        command
            .handler()
            .execute(fields, ctx)
            .await
            .map_err(OrchestratorError::Handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingChannel;
    use crate::domain::command::{
        CommandHandler, FieldMap, ParsedArguments, UsageError,
    };
    use crate::domain::foundation::{ChatId, UserId};
    use crate::domain::wizard::{FieldValue, StepDefinition};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn ctx() -> ChannelContext {
        ChannelContext::new(UserId::new("u1").unwrap(), ChatId::new("lobby").unwrap())
    }

    /// Handler that records every invocation's fields.
    #[derive(Default)]
    struct SpyHandler {
        calls: Mutex<Vec<FieldMap>>,
    }

    impl SpyHandler {
        fn calls(&self) -> Vec<FieldMap> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandHandler for SpyHandler {
        async fn execute(&self, fields: FieldMap, _: &ChannelContext) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push(fields);
            Ok(())
        }
    }

    fn harness() -> (CommandOrchestrator, Arc<WizardEngine>, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::new());
        let wizard = Arc::new(WizardEngine::new(
            Arc::clone(&channel) as Arc<dyn ChatChannel>
        ));
        let orchestrator =
            CommandOrchestrator::new(Arc::clone(&wizard), Arc::clone(&channel) as _);
        (orchestrator, wizard, channel)
    }

    /// Parser used by the "game" test command: expects [day, time, courts],
    /// reporting absent tail positions as missing.
    fn game_parser(args: &[String]) -> Result<ParsedArguments, UsageError> {
        if args.len() > 3 {
            return Err(UsageError::new("usage: /game <day> <time> <courts>"));
        }
        let mut parsed = ParsedArguments::default();
        for (index, name) in ["day", "time", "courts"].iter().enumerate() {
            match args.get(index) {
                Some(value) => {
                    parsed
                        .fields
                        .insert(name.to_string(), FieldValue::String(value.clone()));
                }
                None => parsed.missing.push(name.to_string()),
            }
        }
        Ok(parsed)
    }

    fn game_command(handler: Arc<SpyHandler>) -> CommandDefinition {
        CommandDefinition::new(
            "game",
            "test command",
            game_parser,
            vec![
                StepDefinition::free_text("day", "Which day?"),
                StepDefinition::free_text("time", "What time?"),
                StepDefinition::validated("courts", "How many courts?", |raw| {
                    raw.parse::<u8>()
                        .map(FieldValue::from)
                        .map_err(|_| crate::domain::wizard::StepValidationError::new("a number"))
                }),
            ],
            handler,
        )
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn complete_arguments_invoke_handler_without_wizard() {
        let (orchestrator, wizard, _) = harness();
        let handler = Arc::new(SpyHandler::default());
        let command = game_command(Arc::clone(&handler));
        let ctx = ctx();

        orchestrator
            .run(&command, &args(&["Tue", "21:00", "2"]), &ctx)
            .await
            .unwrap();

        let calls = handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["day"], FieldValue::String("Tue".to_string()));
        assert!(!wizard.is_active(&ctx.user_id).await);
    }

    #[tokio::test]
    async fn missing_field_is_collected_then_handler_runs() {
        let (orchestrator, wizard, _) = harness();
        let handler = Arc::new(SpyHandler::default());
        let command = game_command(Arc::clone(&handler));
        let ctx = ctx();

        let run = {
            let ctx = ctx.clone();
            tokio::spawn(async move { orchestrator.run(&command, &args(&["Tue", "21:00"]), &ctx).await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(wizard.is_active(&ctx.user_id).await);

        wizard.deliver(&ctx, "2").await;
        run.await.unwrap().unwrap();

        let calls = handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["day"], FieldValue::String("Tue".to_string()));
        assert_eq!(calls[0]["time"], FieldValue::String("21:00".to_string()));
        assert_eq!(calls[0]["courts"], FieldValue::from(2u8));
    }

    #[tokio::test]
    async fn steps_are_asked_in_declared_order() {
        let (orchestrator, wizard, channel) = harness();
        let handler = Arc::new(SpyHandler::default());
        // Parser that reports missing names in reverse of step order.
        let command = CommandDefinition::new(
            "game",
            "",
            |_: &[String]| {
                Ok(ParsedArguments {
                    fields: FieldMap::new(),
                    missing: vec!["time".to_string(), "day".to_string()],
                })
            },
            vec![
                StepDefinition::free_text("day", "Which day?"),
                StepDefinition::free_text("time", "What time?"),
            ],
            handler,
        );
        let ctx = ctx();

        let run = {
            let ctx = ctx.clone();
            tokio::spawn(async move { orchestrator.run(&command, &[], &ctx).await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(channel.contains_text("Which day?"));
        assert!(!channel.contains_text("What time?"));

        wizard.deliver(&ctx, "Tue").await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(channel.contains_text("What time?"));

        wizard.deliver(&ctx, "21:00").await;
        run.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn usage_error_is_rendered_and_no_wizard_starts() {
        let (orchestrator, wizard, channel) = harness();
        let handler = Arc::new(SpyHandler::default());
        let command = game_command(Arc::clone(&handler));
        let ctx = ctx();

        orchestrator
            .run(&command, &args(&["a", "b", "c", "d"]), &ctx)
            .await
            .unwrap();

        assert!(channel.contains_text("usage: /game"));
        assert!(!wizard.is_active(&ctx.user_id).await);
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn cancellation_mid_wizard_never_invokes_handler() {
        let (orchestrator, wizard, _) = harness();
        let handler = Arc::new(SpyHandler::default());
        let command = game_command(Arc::clone(&handler));
        let ctx = ctx();

        let run = {
            let ctx = ctx.clone();
            let wizard = Arc::clone(&wizard);
            tokio::spawn(async move {
                let outcome = orchestrator.run(&command, &args(&["Tue", "21:00"]), &ctx).await;
                assert!(!wizard.is_active(&ctx.user_id).await);
                outcome
            })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        wizard.cancel(&ctx.user_id, &ctx).await;
        run.await.unwrap().unwrap();

        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_step_definition_fails_fast() {
        let (orchestrator, wizard, _) = harness();
        let handler = Arc::new(SpyHandler::default());
        let command = CommandDefinition::new(
            "broken",
            "",
            |_: &[String]| {
                Ok(ParsedArguments {
                    fields: FieldMap::new(),
                    missing: vec!["ghost".to_string()],
                })
            },
            vec![],
            Arc::clone(&handler) as Arc<dyn CommandHandler>,
        );
        let ctx = ctx();

        let err = orchestrator.run(&command, &[], &ctx).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::MissingStep { .. }));
        assert!(!wizard.is_active(&ctx.user_id).await);
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn handler_failure_propagates() {
        struct FailingHandler;

        #[async_trait]
        impl CommandHandler for FailingHandler {
            async fn execute(&self, _: FieldMap, _: &ChannelContext) -> Result<(), DomainError> {
                Err(DomainError::new(
                    crate::domain::foundation::ErrorCode::InternalError,
                    "boom",
                ))
            }
        }

        let (orchestrator, _, _) = harness();
        let command = CommandDefinition::new(
            "explode",
            "",
            |_: &[String]| Ok(ParsedArguments::default()),
            vec![],
            Arc::new(FailingHandler),
        );

        let err = orchestrator.run(&command, &[], &ctx()).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::Handler(_)));
    }
}
