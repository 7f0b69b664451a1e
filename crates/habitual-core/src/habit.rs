//! Habit domain types shared by the conversation engine, the scheduler, and the store.

use crate::error::HabitualError;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Shortest allowed execution time, in seconds.
pub const MIN_EXECUTION_SECS: u32 = 1;
/// Longest allowed execution time, in seconds.
pub const MAX_EXECUTION_SECS: u32 = 120;
pub const MAX_PLACE_LEN: usize = 255;
pub const MAX_ACTION_LEN: usize = 500;
pub const MAX_REWARD_LEN: usize = 255;

/// How often a habit recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
}

impl Periodicity {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Parse the storage representation.
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

/// Map an ISO weekday number (1 = Monday … 7 = Sunday) to a `Weekday`.
pub fn weekday_from_number(n: i64) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// External chat identity used for notifications. `None` = not reachable.
    pub external_id: Option<String>,
    pub created_at: String,
}

/// A complete habit ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub place: String,
    pub time: NaiveTime,
    pub action: String,
    pub execution_time_secs: u32,
    pub periodicity: Periodicity,
    /// Required iff `periodicity` is weekly.
    pub day_of_week: Option<Weekday>,
    /// Empty = no reward.
    pub reward: String,
    pub is_public: bool,
}

impl HabitDraft {
    /// Check every field constraint. Returns the first violation found.
    pub fn validate(&self) -> Result<(), HabitualError> {
        if self.place.trim().is_empty() {
            return Err(HabitualError::Validation("place must not be empty".into()));
        }
        if self.place.chars().count() > MAX_PLACE_LEN {
            return Err(HabitualError::Validation(format!(
                "place must be at most {MAX_PLACE_LEN} characters"
            )));
        }
        if self.action.trim().is_empty() {
            return Err(HabitualError::Validation("action must not be empty".into()));
        }
        if self.action.chars().count() > MAX_ACTION_LEN {
            return Err(HabitualError::Validation(format!(
                "action must be at most {MAX_ACTION_LEN} characters"
            )));
        }
        if self.reward.chars().count() > MAX_REWARD_LEN {
            return Err(HabitualError::Validation(format!(
                "reward must be at most {MAX_REWARD_LEN} characters"
            )));
        }
        if !(MIN_EXECUTION_SECS..=MAX_EXECUTION_SECS).contains(&self.execution_time_secs) {
            return Err(HabitualError::Validation(format!(
                "execution time must be between {MIN_EXECUTION_SECS} and {MAX_EXECUTION_SECS} seconds"
            )));
        }
        match (self.periodicity, self.day_of_week) {
            (Periodicity::Weekly, None) => Err(HabitualError::Validation(
                "weekly habit needs a day of week".into(),
            )),
            (Periodicity::Daily, Some(_)) => Err(HabitualError::Validation(
                "daily habit must not have a day of week".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// A persisted habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: i64,
    pub user_id: i64,
    /// The owner's notification target, joined from the owning user.
    pub owner_chat_id: Option<String>,
    pub place: String,
    pub time: NaiveTime,
    pub action: String,
    pub execution_time_secs: u32,
    pub periodicity: Periodicity,
    pub day_of_week: Option<Weekday>,
    pub reward: String,
    pub is_public: bool,
    pub created_at: String,
}

impl Habit {
    /// The recurrence-only view the scheduler works on.
    pub fn schedule(&self) -> HabitSchedule {
        HabitSchedule {
            habit_id: self.id,
            owner_chat_id: self.owner_chat_id.clone(),
            time: self.time,
            periodicity: self.periodicity,
            day_of_week: self.day_of_week,
        }
    }
}

/// Point-in-time recurrence snapshot of one habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitSchedule {
    pub habit_id: i64,
    pub owner_chat_id: Option<String>,
    pub time: NaiveTime,
    pub periodicity: Periodicity,
    pub day_of_week: Option<Weekday>,
}

/// A public habit together with its owner's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicHabit {
    pub habit: Habit,
    pub username: String,
}
