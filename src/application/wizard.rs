//! Wizard engine - interactive collection of missing command fields.
//!
//! Holds at most one pending dialog per user. `collect` suspends the
//! calling command flow until the user answers, cancels, or the inactivity
//! window expires; `deliver` routes raw chat input into the pending dialog.
//!
//! Whichever of {deliver, cancel, timeout} fires first wins; all three
//! funnel through the same removal sequence, so a timer that fires after
//! the dialog was already removed is a guaranteed no-op (each dialog
//! carries an id the timer re-checks under the map lock).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::foundation::{ChannelContext, UserId};
use crate::domain::wizard::{FieldValue, StepDefinition, StepKind, WizardError};
use crate::ports::{ChatChannel, OutboundMessage};

/// How long a dialog waits for an answer before expiring.
///
/// Validation-failure re-prompts deliberately do not reset this window: a
/// slow user can still time out while correcting input.
pub const INACTIVITY_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Acknowledgement sent when a dialog is cancelled explicitly.
const CANCEL_ACK: &str = "Okay, cancelled.";

/// One suspended question/answer exchange.
struct PendingDialog {
    /// Distinguishes this dialog from any later one for the same user, so
    /// a stale expiry timer cannot tear down its successor.
    id: Uuid,
    step: Arc<StepDefinition>,
    reply: oneshot::Sender<Result<FieldValue, WizardError>>,
    expiry: JoinHandle<()>,
}

/// Engine driving multi-step dialogs, one per user.
pub struct WizardEngine {
    dialogs: Arc<Mutex<HashMap<UserId, PendingDialog>>>,
    channel: Arc<dyn ChatChannel>,
    inactivity_window: Duration,
}

impl WizardEngine {
    /// Creates an engine with the default inactivity window.
    pub fn new(channel: Arc<dyn ChatChannel>) -> Self {
        Self::with_inactivity_window(channel, INACTIVITY_WINDOW)
    }

    /// Creates an engine with an explicit inactivity window.
    pub fn with_inactivity_window(channel: Arc<dyn ChatChannel>, window: Duration) -> Self {
        Self {
            dialogs: Arc::new(Mutex::new(HashMap::new())),
            channel,
            inactivity_window: window,
        }
    }

    /// True iff a dialog is pending for the user. Side-effect-free.
    pub async fn is_active(&self, user_id: &UserId) -> bool {
        self.dialogs.lock().await.contains_key(user_id)
    }

    /// Asks one step and suspends until the dialog settles.
    ///
    /// Registers the pending dialog, starts the inactivity timer, then
    /// renders the prompt in a detached task: the suspension is returned
    /// immediately so a transport that processes inbound events strictly
    /// sequentially never deadlocks waiting on its own outbound send.
    ///
    /// # Errors
    ///
    /// - `Cancelled` on explicit cancellation or timeout (indistinguishable)
    /// - `AlreadyActive` if the user already has a pending dialog
    pub async fn collect(
        &self,
        step: Arc<StepDefinition>,
        ctx: &ChannelContext,
    ) -> Result<FieldValue, WizardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let dialog_id = Uuid::new_v4();

        {
            let mut dialogs = self.dialogs.lock().await;
            if dialogs.contains_key(&ctx.user_id) {
                return Err(WizardError::AlreadyActive {
                    user_id: ctx.user_id.clone(),
                });
            }
            let expiry = self.spawn_expiry(dialog_id, ctx.user_id.clone());
            dialogs.insert(
                ctx.user_id.clone(),
                PendingDialog {
                    id: dialog_id,
                    step: Arc::clone(&step),
                    reply: reply_tx,
                    expiry,
                },
            );
        }

        self.spawn_prompt(step, ctx.clone(), None);

        match reply_rx.await {
            Ok(outcome) => outcome,
            // The engine was dropped with the dialog still pending.
            Err(_) => Err(WizardError::Cancelled),
        }
    }

    /// Routes one piece of raw input to the user's pending dialog.
    ///
    /// No-op if no dialog is pending - the normal race outcome of a slow
    /// duplicate event, not an error. A validation failure re-prompts the
    /// same step (prefixed with the failure message) and leaves the dialog
    /// pending with its timer untouched.
    pub async fn deliver(&self, ctx: &ChannelContext, raw: &str) {
        let mut dialogs = self.dialogs.lock().await;
        let step = match dialogs.get(&ctx.user_id) {
            Some(dialog) => Arc::clone(&dialog.step),
            None => {
                debug!(user = %ctx.user_id, "input with no pending dialog, ignoring");
                return;
            }
        };

        match step.parse_answer(raw) {
            Ok(value) => {
                if let Some(dialog) = dialogs.remove(&ctx.user_id) {
                    dialog.expiry.abort();
                    let _ = dialog.reply.send(Ok(value));
                }
            }
            Err(invalid) => {
                drop(dialogs);
                debug!(
                    user = %ctx.user_id,
                    step = step.parameter(),
                    "answer rejected, re-prompting"
                );
                self.spawn_prompt(step, ctx.clone(), Some(invalid.message().to_string()));
            }
        }
    }

    /// Cancels the user's pending dialog, if any.
    ///
    /// Sends a cancellation acknowledgement and settles the suspended
    /// `collect` call with `Cancelled`. No-op (and safe to repeat) if no
    /// dialog is pending.
    pub async fn cancel(&self, user_id: &UserId, ctx: &ChannelContext) {
        let removed = self.dialogs.lock().await.remove(user_id);
        let Some(dialog) = removed else {
            return;
        };
        dialog.expiry.abort();
        let _ = dialog.reply.send(Err(WizardError::Cancelled));

        if let Err(err) = self
            .channel
            .send(ctx, OutboundMessage::text(CANCEL_ACK))
            .await
        {
            warn!(user = %user_id, error = %err, "failed to send cancellation acknowledgement");
        }
    }

    /// Renders and sends a step prompt as a fire-and-forget task.
    ///
    /// Option loaders run here, fresh on every presentation. Send failures
    /// are logged, not propagated: the dialog stays pending and will expire
    /// normally if the user never sees the prompt.
    fn spawn_prompt(
        &self,
        step: Arc<StepDefinition>,
        ctx: ChannelContext,
        preamble: Option<String>,
    ) {
        let channel = Arc::clone(&self.channel);
        tokio::spawn(async move {
            let mut text = String::new();
            if let Some(preamble) = preamble {
                text.push_str(&preamble);
                text.push('\n');
            }
            text.push_str(step.prompt());

            let options = match step.kind() {
                StepKind::PickFromList { options } => match options.load().await {
                    Ok(options) => options,
                    Err(err) => {
                        warn!(step = step.parameter(), error = %err, "option loading failed");
                        Vec::new()
                    }
                },
                StepKind::FreeText { .. } => Vec::new(),
            };

            let message = if options.is_empty() {
                OutboundMessage::text(text)
            } else {
                OutboundMessage::with_options(text, options)
            };
            if let Err(err) = channel.send(&ctx, message).await {
                warn!(step = step.parameter(), error = %err, "failed to send step prompt");
            }
        });
    }

    /// Schedules the inactivity timeout for one dialog.
    fn spawn_expiry(&self, dialog_id: Uuid, user_id: UserId) -> JoinHandle<()> {
        let dialogs = Arc::clone(&self.dialogs);
        let window = self.inactivity_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut dialogs = dialogs.lock().await;
            let still_this_dialog = dialogs
                .get(&user_id)
                .map(|dialog| dialog.id == dialog_id)
                .unwrap_or(false);
            if still_this_dialog {
                if let Some(dialog) = dialogs.remove(&user_id) {
                    debug!(user = %user_id, "dialog expired without an answer");
                    let _ = dialog.reply.send(Err(WizardError::Cancelled));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::chat::RecordingChannel;
    use crate::domain::foundation::ChatId;
    use crate::domain::wizard::StepValidationError;

    fn ctx(user: &str) -> ChannelContext {
        ChannelContext::new(UserId::new(user).unwrap(), ChatId::new("lobby").unwrap())
    }

    fn engine() -> (Arc<WizardEngine>, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::new());
        let engine = Arc::new(WizardEngine::new(
            Arc::clone(&channel) as Arc<dyn ChatChannel>
        ));
        (engine, channel)
    }

    async fn settle() {
        // Let detached prompt tasks run.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    mod answering {
        use super::*;

        #[tokio::test]
        async fn free_text_answer_round_trips() {
            let (engine, _) = engine();
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));
            let ctx = ctx("u1");

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;
            assert!(engine.is_active(&ctx.user_id).await);

            engine.deliver(&ctx, "abc").await;
            let value = collector.await.unwrap().unwrap();
            assert_eq!(value, FieldValue::String("abc".to_string()));
            assert!(!engine.is_active(&ctx.user_id).await);
        }

        #[tokio::test]
        async fn prompt_is_sent_through_the_channel() {
            let (engine, channel) = engine();
            let step = Arc::new(StepDefinition::free_text("name", "What name?"));
            let ctx = ctx("u1");

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;
            assert!(channel.contains_text("What name?"));

            engine.deliver(&ctx, "x").await;
            collector.await.unwrap().unwrap();
        }

        #[tokio::test]
        async fn input_without_dialog_is_ignored() {
            let (engine, channel) = engine();
            engine.deliver(&ctx("u1"), "stray").await;
            assert_eq!(channel.count(), 0);
        }

        #[tokio::test]
        async fn options_are_loaded_fresh_on_every_presentation() {
            use crate::domain::wizard::{OptionsError, OptionsLoader, SelectOption};
            use std::sync::atomic::{AtomicUsize, Ordering};

            #[derive(Default)]
            struct CountingLoader {
                loads: AtomicUsize,
            }

            #[async_trait::async_trait]
            impl OptionsLoader for CountingLoader {
                async fn load(&self) -> Result<Vec<SelectOption>, OptionsError> {
                    self.loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![SelectOption::new("a", "A")])
                }
            }

            let (engine, _) = engine();
            let loader = Arc::new(CountingLoader::default());
            let step = Arc::new(StepDefinition::pick_from_list(
                "choice",
                "Pick one",
                Arc::clone(&loader) as Arc<dyn OptionsLoader>,
            ));
            let ctx = ctx("u1");

            for _ in 0..2 {
                let collector = {
                    let engine = Arc::clone(&engine);
                    let ctx = ctx.clone();
                    let step = Arc::clone(&step);
                    tokio::spawn(async move { engine.collect(step, &ctx).await })
                };
                settle().await;
                engine.deliver(&ctx, "a").await;
                collector.await.unwrap().unwrap();
            }
            settle().await;

            assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
        }
    }

    mod validation {
        use super::*;

        fn courts_step() -> Arc<StepDefinition> {
            Arc::new(StepDefinition::validated("courts", "How many?", |raw| {
                if raw == "good" {
                    Ok(FieldValue::from(42u8))
                } else {
                    Err(StepValidationError::new("X"))
                }
            }))
        }

        #[tokio::test]
        async fn rejected_answer_reprompts_and_keeps_dialog() {
            let (engine, channel) = engine();
            let ctx = ctx("u1");

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(courts_step(), &ctx).await })
            };
            settle().await;

            engine.deliver(&ctx, "bad").await;
            settle().await;
            assert!(engine.is_active(&ctx.user_id).await);
            let reprompt = channel.last().unwrap();
            assert!(reprompt.text.starts_with("X\n"));
            assert!(reprompt.text.contains("How many?"));

            engine.deliver(&ctx, "good").await;
            let value = collector.await.unwrap().unwrap();
            assert_eq!(value, FieldValue::from(42u8));
        }
    }

    mod cancellation {
        use super::*;

        #[tokio::test]
        async fn cancel_settles_collect_with_cancelled() {
            let (engine, channel) = engine();
            let ctx = ctx("u1");
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;

            engine.cancel(&ctx.user_id, &ctx).await;
            assert_eq!(collector.await.unwrap(), Err(WizardError::Cancelled));
            assert!(!engine.is_active(&ctx.user_id).await);
            assert!(channel.contains_text("cancelled"));
        }

        #[tokio::test]
        async fn double_cancel_is_idempotent() {
            let (engine, channel) = engine();
            let ctx = ctx("u1");
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;

            engine.cancel(&ctx.user_id, &ctx).await;
            engine.cancel(&ctx.user_id, &ctx).await;

            assert_eq!(collector.await.unwrap(), Err(WizardError::Cancelled));
            // Only one acknowledgement: the second cancel found nothing.
            let acks = channel
                .messages()
                .iter()
                .filter(|m| m.text.contains("cancelled"))
                .count();
            assert_eq!(acks, 1);
        }

        #[tokio::test]
        async fn cancel_without_dialog_is_a_no_op() {
            let (engine, channel) = engine();
            let ctx = ctx("u1");
            engine.cancel(&ctx.user_id, &ctx).await;
            assert_eq!(channel.count(), 0);
        }
    }

    mod timeout {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn unanswered_dialog_expires_as_cancelled() {
            let (engine, _) = engine();
            let ctx = ctx("u1");
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));

            let outcome = engine.collect(step, &ctx).await;

            assert_eq!(outcome, Err(WizardError::Cancelled));
            assert!(!engine.is_active(&ctx.user_id).await);
        }

        #[tokio::test(start_paused = true)]
        async fn answer_before_window_beats_the_timer() {
            let (engine, _) = engine();
            let ctx = ctx("u1");
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;

            engine.deliver(&ctx, "quick").await;
            let value = collector.await.unwrap().unwrap();
            assert_eq!(value, FieldValue::String("quick".to_string()));

            // Advance past the window: the aborted timer must not disturb
            // a later dialog for the same user.
            tokio::time::advance(INACTIVITY_WINDOW * 2).await;
            settle().await;

            let step = Arc::new(StepDefinition::free_text("again", "Again?"));
            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;
            engine.deliver(&ctx, "still works").await;
            assert!(collector.await.unwrap().is_ok());
        }
    }

    mod concurrency {
        use super::*;

        #[tokio::test]
        async fn second_collect_for_same_user_is_rejected() {
            let (engine, _) = engine();
            let ctx = ctx("u1");
            let step = Arc::new(StepDefinition::free_text("name", "Name?"));

            let collector = {
                let engine = Arc::clone(&engine);
                let ctx = ctx.clone();
                let step = Arc::clone(&step);
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;

            let second = engine.collect(step, &ctx).await;
            assert!(matches!(second, Err(WizardError::AlreadyActive { .. })));

            // The original dialog is untouched.
            engine.deliver(&ctx, "fine").await;
            assert!(collector.await.unwrap().is_ok());
        }

        #[tokio::test]
        async fn dialogs_for_different_users_are_independent() {
            let (engine, _) = engine();
            let ctx_a = ctx("alice");
            let ctx_b = ctx("bob");

            let collect_a = {
                let engine = Arc::clone(&engine);
                let ctx = ctx_a.clone();
                let step = Arc::new(StepDefinition::free_text("name", "A?"));
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            let collect_b = {
                let engine = Arc::clone(&engine);
                let ctx = ctx_b.clone();
                let step = Arc::new(StepDefinition::free_text("name", "B?"));
                tokio::spawn(async move { engine.collect(step, &ctx).await })
            };
            settle().await;

            // Answer in reverse order of starting.
            engine.deliver(&ctx_b, "from bob").await;
            engine.deliver(&ctx_a, "from alice").await;

            assert_eq!(
                collect_a.await.unwrap().unwrap(),
                FieldValue::String("from alice".to_string())
            );
            assert_eq!(
                collect_b.await.unwrap().unwrap(),
                FieldValue::String("from bob".to_string())
            );
        }
    }
}
