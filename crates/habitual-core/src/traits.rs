use crate::{
    error::HabitualError,
    habit::{Habit, HabitDraft, HabitSchedule, PublicHabit, User},
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging Channel trait.
///
/// Every messaging platform implements this trait to receive user turns and
/// to deliver replies and reminders.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, HabitualError>;

    /// Send a message through this channel.
    ///
    /// Errors are classified with [`HabitualError::is_transient`]: transient
    /// failures may be retried, everything else is final for that target.
    async fn send(&self, message: OutgoingMessage) -> Result<(), HabitualError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), HabitualError>;
}

/// Lookup and provisioning of users by their external chat identity.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, HabitualError>;

    /// Create a user. Fails with [`HabitualError::Conflict`] if the username is taken.
    async fn create_user(
        &self,
        username: &str,
        external_id: &str,
        secret: &str,
    ) -> Result<User, HabitualError>;
}

/// Habit persistence as seen by the conversation engine and the scheduler.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Persist a new habit. Rejects invalid drafts with [`HabitualError::Validation`].
    async fn create_habit(&self, owner: &User, draft: &HabitDraft) -> Result<Habit, HabitualError>;

    /// Current snapshot of one habit, `None` if it no longer exists.
    async fn get_habit(&self, id: i64) -> Result<Option<Habit>, HabitualError>;

    /// A user's habits ordered by time of day.
    async fn list_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<Habit>, HabitualError>;

    /// Most recently created public habits.
    async fn list_public(&self, limit: usize) -> Result<Vec<PublicHabit>, HabitualError>;

    /// Recurrence snapshots of every habit whose owner has a notification target.
    async fn list_all_schedules(&self) -> Result<Vec<HabitSchedule>, HabitualError>;
}
