//! Reminder dispatcher: delivers due occurrences off the matcher's tick.
//!
//! Occurrences arrive on an unbounded queue and are delivered by spawned
//! tasks, at most `workers` at a time. A transient failure re-submits the
//! attempt after an exponential backoff; the worker never sleeps.

use super::matcher::DueOccurrence;
use crate::i18n;
use habitual_core::{
    config::DispatcherConfig,
    message::OutgoingMessage,
    traits::{Channel, HabitRepository},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Upper bound for a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// How often and how patiently a failed delivery is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total deliveries tried per occurrence, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &DispatcherConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_secs(config.backoff_secs),
            max_delay: MAX_BACKOFF,
        }
    }

    /// Delay before the attempt following attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// One delivery attempt of one occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAttempt {
    pub occurrence: DueOccurrence,
    /// 1-based.
    pub attempt: u32,
    pub last_error: Option<String>,
}

/// Result of a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Nothing to deliver (habit gone, no target). Not an error.
    Skipped(String),
    /// Transient failure, may be retried.
    Retry(String),
    /// Permanent failure, never retried.
    Dropped(String),
}

/// Cloneable submission side of a running dispatcher.
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: mpsc::UnboundedSender<DispatchAttempt>,
}

impl DispatcherHandle {
    /// Queue an occurrence for delivery. Never blocks.
    ///
    /// Returns `false` if the dispatcher has stopped.
    pub fn submit(&self, occurrence: DueOccurrence) -> bool {
        self.tx
            .send(DispatchAttempt {
                occurrence,
                attempt: 1,
                last_error: None,
            })
            .is_ok()
    }
}

/// Sends habit reminders through a channel.
pub struct ReminderDispatcher {
    habits: Arc<dyn HabitRepository>,
    channel: Arc<dyn Channel>,
    lang: String,
    policy: RetryPolicy,
    workers: usize,
}

impl ReminderDispatcher {
    pub fn new(
        habits: Arc<dyn HabitRepository>,
        channel: Arc<dyn Channel>,
        lang: impl Into<String>,
        policy: RetryPolicy,
        workers: usize,
    ) -> Self {
        Self {
            habits,
            channel,
            lang: lang.into(),
            policy,
            workers: workers.max(1),
        }
    }

    /// Start the dispatch loop. It runs until every handle is dropped.
    pub fn spawn(self) -> (DispatcherHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let retry_tx = tx.downgrade();
        let task = tokio::spawn(Arc::new(self).run(rx, retry_tx));
        (DispatcherHandle { tx }, task)
    }

    async fn run(
        self: Arc<Self>,
        mut rx: mpsc::UnboundedReceiver<DispatchAttempt>,
        retry_tx: mpsc::WeakUnboundedSender<DispatchAttempt>,
    ) {
        info!(
            "reminder dispatcher running | channel: {} | workers: {} | max attempts: {}",
            self.channel.name(),
            self.workers,
            self.policy.max_attempts
        );
        let permits = Arc::new(Semaphore::new(self.workers));

        while let Some(attempt) = rx.recv().await {
            let Ok(permit) = permits.clone().acquire_owned().await else {
                break;
            };
            let this = self.clone();
            let retry_tx = retry_tx.clone();
            if let Some(ref previous) = attempt.last_error {
                debug!(
                    "retrying reminder for habit {} (attempt {}, last error: {previous})",
                    attempt.occurrence.habit_id, attempt.attempt
                );
            }
            tokio::spawn(async move {
                let outcome = this.deliver(&attempt.occurrence).await;
                drop(permit);
                this.settle(attempt, outcome, retry_tx);
            });
        }

        info!("reminder dispatcher stopped");
    }

    /// Try to deliver one occurrence against the habit's current snapshot.
    pub async fn deliver(&self, occurrence: &DueOccurrence) -> DeliveryOutcome {
        let habit = match self.habits.get_habit(occurrence.habit_id).await {
            Ok(Some(habit)) => habit,
            Ok(None) => return DeliveryOutcome::Skipped("habit no longer exists".into()),
            Err(e) => return DeliveryOutcome::Retry(format!("failed to load habit: {e}")),
        };

        let Some(target) = habit
            .owner_chat_id
            .clone()
            .filter(|target| !target.trim().is_empty())
        else {
            return DeliveryOutcome::Skipped("owner has no notification target".into());
        };

        let message = OutgoingMessage::text(target, i18n::reminder(&self.lang, &habit));
        match self.channel.send(message).await {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) if e.is_transient() => DeliveryOutcome::Retry(e.to_string()),
            Err(e) => DeliveryOutcome::Dropped(e.to_string()),
        }
    }

    /// Log the outcome and schedule a retry when one is warranted.
    fn settle(
        &self,
        attempt: DispatchAttempt,
        outcome: DeliveryOutcome,
        retry_tx: mpsc::WeakUnboundedSender<DispatchAttempt>,
    ) {
        let habit_id = attempt.occurrence.habit_id;
        match outcome {
            DeliveryOutcome::Delivered => info!(
                "reminder for habit {habit_id} delivered (window {}, attempt {})",
                attempt.occurrence.window, attempt.attempt
            ),
            DeliveryOutcome::Skipped(reason) => {
                debug!("reminder for habit {habit_id} skipped: {reason}")
            }
            DeliveryOutcome::Dropped(reason) => {
                warn!("reminder for habit {habit_id} undeliverable: {reason}")
            }
            DeliveryOutcome::Retry(reason) if attempt.attempt >= self.policy.max_attempts => warn!(
                "reminder for habit {habit_id} dropped after {} attempts: {reason}",
                attempt.attempt
            ),
            DeliveryOutcome::Retry(reason) => {
                let delay = self.policy.delay_after(attempt.attempt);
                warn!(
                    "reminder for habit {habit_id} failed (attempt {}), retrying in {delay:?}: {reason}",
                    attempt.attempt
                );
                let next = DispatchAttempt {
                    occurrence: attempt.occurrence,
                    attempt: attempt.attempt + 1,
                    last_error: Some(reason),
                };
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    match retry_tx.upgrade() {
                        Some(tx) => {
                            if tx.send(next).is_err() {
                                debug!("dispatcher closed, retry for habit {habit_id} abandoned");
                            }
                        }
                        None => debug!("dispatcher stopped, retry for habit {habit_id} abandoned"),
                    }
                });
            }
        }
    }
}
