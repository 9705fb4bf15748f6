//! Inbound update dispatcher.
//!
//! First routing stop for every piece of chat input. A user with a pending
//! dialog gets their input routed into the wizard engine (with `/cancel`
//! special-cased); everyone else's slash commands are looked up in the
//! registry and run in a detached task, so the inbound loop is free to
//! carry the wizard answers the running command is waiting for.

use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::command::CommandRegistry;
use crate::domain::foundation::ChannelContext;
use crate::ports::{ChatChannel, OutboundMessage};

use super::orchestrator::CommandOrchestrator;
use super::wizard::WizardEngine;

/// The cancel keyword, checked before any registry lookup.
const CANCEL_COMMAND: &str = "/cancel";

/// One inbound chat update.
#[derive(Debug, Clone)]
pub struct InboundUpdate {
    pub context: ChannelContext,
    pub text: String,
}

/// Routes inbound updates to the wizard engine or the command registry.
pub struct UpdateDispatcher {
    registry: Arc<CommandRegistry>,
    orchestrator: Arc<CommandOrchestrator>,
    wizard: Arc<WizardEngine>,
    channel: Arc<dyn ChatChannel>,
}

impl UpdateDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        registry: Arc<CommandRegistry>,
        orchestrator: Arc<CommandOrchestrator>,
        wizard: Arc<WizardEngine>,
        channel: Arc<dyn ChatChannel>,
    ) -> Self {
        Self {
            registry,
            orchestrator,
            wizard,
            channel,
        }
    }

    /// Handles one update.
    ///
    /// Returns once the update is routed; command runs continue in a
    /// detached task and report their own failures to the user.
    pub async fn dispatch(&self, update: InboundUpdate) {
        let text = update.text.trim();
        if text.is_empty() {
            return;
        }

        if self.wizard.is_active(&update.context.user_id).await {
            if text.eq_ignore_ascii_case(CANCEL_COMMAND) {
                self.wizard
                    .cancel(&update.context.user_id, &update.context)
                    .await;
            } else {
                self.wizard.deliver(&update.context, text).await;
            }
            return;
        }

        let Some(rest) = text.strip_prefix('/') else {
            debug!(user = %update.context.user_id, "plain text with no pending dialog, ignoring");
            return;
        };

        let mut parts = rest.split_whitespace();
        let Some(name) = parts.next().map(str::to_ascii_lowercase) else {
            return;
        };
        let args: Vec<String> = parts.map(str::to_string).collect();

        let Some(command) = self.registry.get(&name) else {
            self.send_help(&update.context, &name).await;
            return;
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let channel = Arc::clone(&self.channel);
        let ctx = update.context;
        tokio::spawn(async move {
            if let Err(err) = orchestrator.run(&command, &args, &ctx).await {
                error!(command = command.name(), error = %err, "command run failed");
                let report = OutboundMessage::text("Something went wrong, please try again.");
                if let Err(send_err) = channel.send(&ctx, report).await {
                    error!(error = %send_err, "failed to report command failure");
                }
            }
        });
    }

    async fn send_help(&self, ctx: &ChannelContext, name: &str) {
        let catalogue = self
            .registry
            .names()
            .iter()
            .map(|n| format!("/{}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let text = format!("Unknown command `/{}`. Try one of: {}", name, catalogue);
        if let Err(err) = self.channel.send(ctx, OutboundMessage::text(text)).await {
            error!(error = %err, "failed to send help message");
        }
    }
}
