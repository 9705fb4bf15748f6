//! Console entrypoint.
//!
//! Wires the in-memory adapters to the dispatcher and feeds it lines from
//! stdin, one update per line. A real chat transport would replace the
//! read loop and the console channel; everything behind the dispatcher
//! stays the same.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matchday::adapters::chat::ConsoleChannel;
use matchday::adapters::memory::{InMemoryEventStore, InMemoryTemplateStore};
use matchday::application::{
    build_registry, CommandDependencies, CommandOrchestrator, InboundUpdate, UpdateDispatcher,
    WizardEngine,
};
use matchday::config::AppConfig;
use matchday::domain::foundation::{ChannelContext, ChatId, UserId};
use matchday::domain::scheduling::EventLock;
use matchday::ports::ChatChannel;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    info!(bot = %config.chat.bot_name, "starting up");

    let channel: Arc<dyn ChatChannel> = Arc::new(ConsoleChannel::new());
    let deps = CommandDependencies {
        templates: Arc::new(InMemoryTemplateStore::new()),
        events: Arc::new(InMemoryEventStore::new()),
        lock: Arc::new(EventLock::new()),
        channel: Arc::clone(&channel),
    };
    let registry = Arc::new(build_registry(&deps));
    let wizard = Arc::new(WizardEngine::with_inactivity_window(
        Arc::clone(&channel),
        config.dialog.inactivity_window(),
    ));
    let orchestrator = Arc::new(CommandOrchestrator::new(
        Arc::clone(&wizard),
        Arc::clone(&channel),
    ));
    let dispatcher = UpdateDispatcher::new(registry, orchestrator, wizard, channel);

    let context = ChannelContext::new(
        UserId::new("console")?,
        ChatId::new(&config.chat.default_chat_id)?,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                dispatcher
                    .dispatch(InboundUpdate {
                        context: context.clone(),
                        text: line,
                    })
                    .await;
            }
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(err) => {
                error!(error = %err, "failed to read input");
                break;
            }
        }
    }

    Ok(())
}
