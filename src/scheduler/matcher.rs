//! Schedule matcher: decides which recurring habits are due at a given instant.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use habitual_core::habit::{HabitSchedule, Periodicity};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One scheduled firing that should be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DueOccurrence {
    pub habit_id: i64,
    /// Nominal date and time of the firing. Identifies the occurrence.
    pub window: NaiveDateTime,
}

/// Evaluates schedule snapshots tick by tick, emitting each occurrence at most once.
pub struct ScheduleMatcher {
    tolerance: Duration,
    /// Last dispatched window per habit.
    dispatched: HashMap<i64, NaiveDateTime>,
}

impl ScheduleMatcher {
    pub fn new(tolerance_minutes: u32) -> Self {
        Self {
            tolerance: Duration::minutes(i64::from(tolerance_minutes)),
            dispatched: HashMap::new(),
        }
    }

    /// Occurrences due at `now` that have not been emitted before.
    ///
    /// `now` is truncated to the minute. Habits without a notification target
    /// are never due.
    pub fn evaluate(
        &mut self,
        now: NaiveDateTime,
        schedules: &[HabitSchedule],
    ) -> Vec<DueOccurrence> {
        let now = truncate_to_minute(now);
        let mut due = Vec::new();

        for schedule in schedules {
            let has_target = schedule
                .owner_chat_id
                .as_deref()
                .is_some_and(|target| !target.trim().is_empty());
            if !has_target {
                continue;
            }
            let Some(window) = self.nearest_window(now, schedule) else {
                continue;
            };
            if self.dispatched.get(&schedule.habit_id) == Some(&window) {
                continue;
            }
            debug!("habit {} due for window {window}", schedule.habit_id);
            self.dispatched.insert(schedule.habit_id, window);
            due.push(DueOccurrence {
                habit_id: schedule.habit_id,
                window,
            });
        }

        let present: HashSet<i64> = schedules.iter().map(|s| s.habit_id).collect();
        self.dispatched.retain(|id, _| present.contains(id));
        due
    }

    /// Number of habits with a recorded dispatch.
    pub fn tracked(&self) -> usize {
        self.dispatched.len()
    }

    /// The firing within tolerance of `now` closest to it, if any.
    ///
    /// Daily schedules also consider yesterday's and tomorrow's firings, so
    /// windows that straddle midnight keep the date of their nominal firing.
    /// Weekly schedules are only due on their own weekday, against that day's
    /// firing.
    fn nearest_window(
        &self,
        now: NaiveDateTime,
        schedule: &HabitSchedule,
    ) -> Option<NaiveDateTime> {
        let time = schedule.time.with_second(0)?.with_nanosecond(0)?;
        let today = now.date();
        let dates = match schedule.periodicity {
            Periodicity::Daily => [today.pred_opt(), Some(today), today.succ_opt()],
            Periodicity::Weekly if schedule.day_of_week == Some(today.weekday()) => {
                [None, Some(today), None]
            }
            Periodicity::Weekly => return None,
        };
        dates
            .into_iter()
            .flatten()
            .map(|date| date.and_time(time))
            .filter(|firing| (*firing - now).abs() <= self.tolerance)
            .min_by_key(|firing| (*firing - now).abs())
    }
}

fn truncate_to_minute(t: NaiveDateTime) -> NaiveDateTime {
    t.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}
