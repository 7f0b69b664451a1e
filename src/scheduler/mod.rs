//! Habit reminders: a periodic matcher feeding an asynchronous dispatcher.
//!
//! - `matcher`: decides which schedules are due, once per occurrence
//! - `dispatcher`: delivers reminders with bounded concurrency and retries

pub mod dispatcher;
pub mod matcher;


pub use dispatcher::{DispatcherHandle, ReminderDispatcher, RetryPolicy};
pub use matcher::{DueOccurrence, ScheduleMatcher};

use chrono::NaiveDateTime;
use habitual_core::traits::HabitRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Background task: evaluate every schedule once per `poll_interval`.
///
/// Ticks never overlap; a tick that falls behind is skipped.
pub async fn matcher_loop(
    habits: Arc<dyn HabitRepository>,
    mut matcher: ScheduleMatcher,
    dispatcher: DispatcherHandle,
    poll_interval: Duration,
) {
    info!("schedule matcher running every {}s", poll_interval.as_secs());
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let now = chrono::Local::now().naive_local();
        run_tick(habits.as_ref(), &mut matcher, &dispatcher, now).await;
    }
}

/// One matcher tick. Returns the number of occurrences handed to the dispatcher.
pub async fn run_tick(
    habits: &dyn HabitRepository,
    matcher: &mut ScheduleMatcher,
    dispatcher: &DispatcherHandle,
    now: NaiveDateTime,
) -> usize {
    let schedules = match habits.list_all_schedules().await {
        Ok(schedules) => schedules,
        Err(e) => {
            error!("scheduler: failed to load schedules: {e}");
            return 0;
        }
    };

    let mut submitted = 0;
    for occurrence in matcher.evaluate(now, &schedules) {
        if dispatcher.submit(occurrence.clone()) {
            submitted += 1;
        } else {
            warn!(
                "scheduler: dispatcher stopped, reminder for habit {} not queued",
                occurrence.habit_id
            );
        }
    }
    submitted
}
