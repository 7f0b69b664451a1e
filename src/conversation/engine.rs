//! Conversation engine: owns one session per chat.

use super::parse::InputError;
use super::state::{Session, State, Step};
use super::Reply;
use crate::i18n::{self, t};
use crate::identity::ChatIdentityBridge;
use chrono::Weekday;
use dashmap::DashMap;
use habitual_core::{message::Keyboard, traits::HabitRepository};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info};

type SessionSlot = Arc<Mutex<Option<Session>>>;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Drives habit-creation conversations.
///
/// Sessions for different chats never contend; turns for the same chat are
/// serialized on that chat's slot.
pub struct ConversationEngine {
    identity: ChatIdentityBridge,
    habits: Arc<dyn HabitRepository>,
    lang: String,
    ttl: Option<Duration>,
    sessions: DashMap<String, SessionSlot>,
}

impl ConversationEngine {
    pub fn new(
        identity: ChatIdentityBridge,
        habits: Arc<dyn HabitRepository>,
        lang: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            identity,
            habits,
            lang: lang.into(),
            ttl,
            sessions: DashMap::new(),
        }
    }

    /// Enter the conversation. Restarts it if one is already in progress.
    pub async fn begin(&self, chat_id: &str) -> Reply {
        let owner = match self.identity.resolve(chat_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Reply::text(t("not_registered", &self.lang)),
            Err(e) => {
                error!("identity lookup failed for chat {chat_id}: {e}");
                return Reply::text(t("error_generic", &self.lang));
            }
        };

        let (_slot, mut guard) = self.lock_or_create(chat_id).await;
        if guard.is_some() {
            info!("restarting habit conversation for chat {chat_id}");
        } else {
            info!("habit conversation started for chat {chat_id}");
        }
        *guard = Some(Session::new(owner));
        self.prompt(State::Place, None)
    }

    /// Feed one text turn. `None` when the chat has no conversation in progress.
    pub async fn handle_text(&self, chat_id: &str, text: &str) -> Option<Reply> {
        let (slot, mut guard) = self.lock_existing(chat_id).await?;
        let now = Instant::now();

        let live = match guard.as_ref() {
            Some(session) if session.is_expired(now, self.ttl) => {
                info!("habit conversation for chat {chat_id} expired");
                false
            }
            Some(_) => true,
            None => false,
        };
        if !live {
            *guard = None;
            self.release(chat_id, &slot);
            return None;
        }

        let session = guard.as_mut()?;
        session.last_activity = now;
        let reply = match session.apply(text) {
            Err(e) => {
                debug!("chat {chat_id} input rejected in {:?}: {e}", session.state);
                self.retry(session.state, &e)
            }
            Ok(Step::Next(state)) => self.prompt(state, Some(&*session)),
            Ok(Step::Declined) => {
                info!("habit conversation declined for chat {chat_id}");
                *guard = None;
                self.release(chat_id, &slot);
                Reply::closing(t("habit_cancelled", &self.lang))
            }
            Ok(Step::Confirmed(draft)) => {
                let owner = session.owner.clone();
                let reply = match self.habits.create_habit(&owner, &draft).await {
                    Ok(habit) => {
                        info!(
                            "habit {} created for user {} (chat {chat_id})",
                            habit.id, owner.username
                        );
                        Reply::closing(i18n::habit_created(&self.lang, &habit))
                    }
                    Err(e) => {
                        error!("failed to create habit for chat {chat_id}: {e}");
                        Reply::closing(i18n::create_failed(&self.lang, &e.to_string()))
                    }
                };
                *guard = None;
                self.release(chat_id, &slot);
                reply
            }
        };
        Some(reply)
    }

    /// Abort the conversation without committing anything.
    pub async fn cancel(&self, chat_id: &str) -> Reply {
        if let Some((slot, mut guard)) = self.lock_existing(chat_id).await {
            let now = Instant::now();
            let had_live = guard
                .take()
                .is_some_and(|session| !session.is_expired(now, self.ttl));
            self.release(chat_id, &slot);
            if had_live {
                info!("habit conversation cancelled for chat {chat_id}");
                return Reply::closing(t("habit_cancelled", &self.lang));
            }
        }
        Reply::closing(t("nothing_to_cancel", &self.lang))
    }

    /// Current state of the chat's conversation, if one exists.
    pub async fn state(&self, chat_id: &str) -> Option<State> {
        let (_slot, guard) = self.lock_existing(chat_id).await?;
        guard.as_ref().map(|session| session.state)
    }

    /// Number of chats with a session slot.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drop sessions idle past the TTL. Busy sessions are skipped.
    pub fn purge_expired(&self, now: Instant) -> usize {
        if self.ttl.is_none() {
            return 0;
        }

        let candidates: Vec<(String, SessionSlot)> = self
            .sessions
            .iter()
            .filter(|entry| {
                entry.value().try_lock().is_ok_and(|guard| {
                    guard
                        .as_ref()
                        .map_or(true, |session| session.is_expired(now, self.ttl))
                })
            })
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut purged = 0;
        for (chat_id, slot) in candidates {
            let Ok(mut guard) = slot.try_lock() else {
                continue;
            };
            let expired = guard
                .as_ref()
                .map_or(true, |session| session.is_expired(now, self.ttl));
            if !expired {
                continue;
            }
            if guard.take().is_some() {
                purged += 1;
                debug!("purged idle habit conversation for chat {chat_id}");
            }
            self.sessions
                .remove_if(&chat_id, |_, current| Arc::ptr_eq(current, &slot));
        }
        purged
    }

    /// Lock the chat's slot, creating it if absent.
    async fn lock_or_create(
        &self,
        chat_id: &str,
    ) -> (SessionSlot, OwnedMutexGuard<Option<Session>>) {
        loop {
            let slot = self
                .sessions
                .entry(chat_id.to_string())
                .or_insert_with(SessionSlot::default)
                .value()
                .clone();
            let guard = slot.clone().lock_owned().await;
            if self.is_current(chat_id, &slot) {
                return (slot, guard);
            }
        }
    }

    /// Lock the chat's slot if one exists.
    async fn lock_existing(
        &self,
        chat_id: &str,
    ) -> Option<(SessionSlot, OwnedMutexGuard<Option<Session>>)> {
        loop {
            let slot = self.sessions.get(chat_id)?.value().clone();
            let guard = slot.clone().lock_owned().await;
            if self.is_current(chat_id, &slot) {
                return Some((slot, guard));
            }
        }
    }

    /// A slot released while we waited for its lock is stale.
    fn is_current(&self, chat_id: &str, slot: &SessionSlot) -> bool {
        self.sessions
            .get(chat_id)
            .is_some_and(|entry| Arc::ptr_eq(entry.value(), slot))
    }

    /// Unmap the slot. Must be called while its lock is held.
    fn release(&self, chat_id: &str, slot: &SessionSlot) {
        self.sessions
            .remove_if(chat_id, |_, current| Arc::ptr_eq(current, slot));
    }

    fn keyboard_for(&self, state: State) -> Keyboard {
        let lang = self.lang.as_str();
        match state {
            State::Place | State::Reward => Keyboard::Remove,
            State::Time | State::Action => Keyboard::Keep,
            State::ExecutionTime => Keyboard::choices(&[&["60", "90", "120"]]),
            State::Periodicity => {
                Keyboard::choices(&[&[t("choice_daily", lang), t("choice_weekly", lang)]])
            }
            State::DayOfWeek => {
                let names: Vec<&str> = WEEK.iter().map(|d| i18n::weekday_name(lang, *d)).collect();
                Keyboard::choices(&[&names[0..3], &names[3..6], &names[6..]])
            }
            State::Confirm => Keyboard::choices(&[&[t("choice_yes", lang), t("choice_no", lang)]]),
        }
    }

    /// The question asked on entering `state`.
    fn prompt(&self, state: State, session: Option<&Session>) -> Reply {
        let lang = self.lang.as_str();
        let text = match state {
            State::Place => t("prompt_place", lang).to_string(),
            State::Time => t("prompt_time", lang).to_string(),
            State::Action => t("prompt_action", lang).to_string(),
            State::ExecutionTime => t("prompt_execution_time", lang).to_string(),
            State::Periodicity => t("prompt_periodicity", lang).to_string(),
            State::DayOfWeek => t("prompt_day_of_week", lang).to_string(),
            State::Reward => t("prompt_reward", lang).to_string(),
            State::Confirm => match session.and_then(|s| s.draft.complete()) {
                Some(draft) => i18n::draft_summary(lang, &draft),
                None => t("confirm_question", lang).to_string(),
            },
        };
        Reply::with_keyboard(text, self.keyboard_for(state))
    }

    /// Re-prompt after a rejected turn. Choice states re-offer their keyboard.
    fn retry(&self, state: State, err: &InputError) -> Reply {
        let keyboard = match state {
            State::Place | State::Time | State::Action | State::Reward => Keyboard::Keep,
            _ => self.keyboard_for(state),
        };
        Reply::with_keyboard(t(err.retry_key(), &self.lang), keyboard)
    }
}
