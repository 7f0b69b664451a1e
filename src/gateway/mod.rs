//! Gateway: the main event loop connecting channels, commands, the
//! conversation engine, and the reminder pipeline.
//!
//! Includes: per-chat ordered processing, the idle-session sweeper, the
//! schedule matcher and reminder dispatcher tasks, and graceful shutdown.

mod routing;


use crate::conversation::ConversationEngine;
use crate::identity::ChatIdentityBridge;
use crate::scheduler::{self, ReminderDispatcher, RetryPolicy, ScheduleMatcher};
use habitual_core::{
    config::{Config, DispatcherConfig, SchedulerConfig},
    message::IncomingMessage,
    traits::{Channel, HabitRepository, UserDirectory},
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How often idle conversations are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The central gateway that routes messages between channels and the bot logic.
pub struct Gateway {
    pub(super) channels: HashMap<String, Arc<dyn Channel>>,
    pub(super) identity: ChatIdentityBridge,
    pub(super) habits: Arc<dyn HabitRepository>,
    pub(super) engine: Arc<ConversationEngine>,
    pub(super) scheduler_config: SchedulerConfig,
    pub(super) dispatcher_config: DispatcherConfig,
    pub(super) lang: String,
    /// Chats with a message in progress. Later messages queue here in arrival order.
    pub(super) active_chats: Mutex<HashMap<String, VecDeque<IncomingMessage>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channels: HashMap<String, Arc<dyn Channel>>,
        users: Arc<dyn UserDirectory>,
        habits: Arc<dyn HabitRepository>,
        config: &Config,
    ) -> Self {
        let identity = ChatIdentityBridge::new(users);
        let engine = Arc::new(ConversationEngine::new(
            identity.clone(),
            habits.clone(),
            config.bot.language.clone(),
            config.conversation.session_ttl(),
        ));
        Self {
            channels,
            identity,
            habits,
            engine,
            scheduler_config: config.scheduler.clone(),
            dispatcher_config: config.dispatcher.clone(),
            lang: config.bot.language.clone(),
            active_chats: Mutex::new(HashMap::new()),
        }
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Habitual gateway running | channels: {} | scheduler: {} | language: {}",
            self.channels.keys().cloned().collect::<Vec<_>>().join(", "),
            if self.scheduler_config.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.lang,
        );

        let (tx, mut rx) = mpsc::channel::<IncomingMessage>(256);

        for (name, channel) in &self.channels {
            let mut channel_rx = channel
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("failed to start channel {name}: {e}"))?;
            let tx = tx.clone();
            let channel_name = name.clone();

            tokio::spawn(async move {
                while let Some(msg) = channel_rx.recv().await {
                    if tx.send(msg).await.is_err() {
                        info!("gateway receiver dropped, stopping {channel_name} forwarder");
                        break;
                    }
                }
            });

            info!("Channel started: {name}");
        }

        drop(tx);

        let reminder_handles = self.spawn_reminders();

        // Spawn idle-conversation sweeper.
        let sweep_engine = self.engine.clone();
        let sweeper_handle = tokio::spawn(async move {
            Self::session_sweeper(sweep_engine, SESSION_SWEEP_INTERVAL).await;
        });

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                Some(incoming) = rx.recv() => {
                    let gw = self.clone();
                    tokio::spawn(async move {
                        gw.dispatch_message(incoming).await;
                    });
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&reminder_handles, &sweeper_handle).await;
        Ok(())
    }

    /// Spawn the dispatcher and the matcher loop feeding it.
    fn spawn_reminders(&self) -> Vec<JoinHandle<()>> {
        if !self.scheduler_config.enabled {
            info!("Scheduler disabled, no reminders will be sent");
            return Vec::new();
        }
        let Some(channel) = self.channels.get(&self.scheduler_config.channel) else {
            warn!(
                "Scheduler channel '{}' is not running, no reminders will be sent",
                self.scheduler_config.channel
            );
            return Vec::new();
        };

        let dispatcher = ReminderDispatcher::new(
            self.habits.clone(),
            channel.clone(),
            self.lang.clone(),
            RetryPolicy::from_config(&self.dispatcher_config),
            self.dispatcher_config.workers,
        );
        let (dispatch, dispatch_task) = dispatcher.spawn();

        let matcher = ScheduleMatcher::new(self.scheduler_config.tolerance_minutes);
        let poll = Duration::from_secs(self.scheduler_config.poll_interval_secs.max(1));
        let habits = self.habits.clone();
        let matcher_task = tokio::spawn(async move {
            scheduler::matcher_loop(habits, matcher, dispatch, poll).await;
        });

        vec![matcher_task, dispatch_task]
    }

    /// Background task: discard conversations idle past their TTL.
    async fn session_sweeper(engine: Arc<ConversationEngine>, every: Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let purged = engine.purge_expired(Instant::now());
            if purged > 0 {
                info!("discarded {purged} idle habit conversation(s)");
            }
        }
    }

    /// Graceful shutdown: abort background tasks, stop channels.
    async fn shutdown(&self, reminder_handles: &[JoinHandle<()>], sweeper_handle: &JoinHandle<()>) {
        info!("Shutting down...");

        for handle in reminder_handles {
            handle.abort();
        }
        sweeper_handle.abort();

        let open = self.engine.active_sessions();
        if open > 0 {
            info!("dropping {open} unfinished habit conversation(s)");
        }

        for (name, channel) in &self.channels {
            if let Err(e) = channel.stop().await {
                warn!("failed to stop channel {name}: {e}");
            }
        }

        info!("Shutdown complete.");
    }
}
