//! Conversation states, the accumulating draft, and the per-chat session.

use super::parse::{self, InputError};
use chrono::{NaiveTime, Weekday};
use habitual_core::habit::{HabitDraft, Periodicity, User};
use std::time::{Duration, Instant};

/// Data-collection steps, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Place,
    Time,
    Action,
    ExecutionTime,
    Periodicity,
    DayOfWeek,
    Reward,
    Confirm,
}

/// Fields collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub place: Option<String>,
    pub time: Option<NaiveTime>,
    pub action: Option<String>,
    pub execution_time_secs: Option<u32>,
    pub periodicity: Option<Periodicity>,
    pub day_of_week: Option<Weekday>,
    pub reward: Option<String>,
}

impl Draft {
    /// The first state whose field is still missing, `None` once complete.
    pub fn first_missing(&self) -> Option<State> {
        if self.place.is_none() {
            Some(State::Place)
        } else if self.time.is_none() {
            Some(State::Time)
        } else if self.action.is_none() {
            Some(State::Action)
        } else if self.execution_time_secs.is_none() {
            Some(State::ExecutionTime)
        } else if self.periodicity.is_none() {
            Some(State::Periodicity)
        } else if self.periodicity == Some(Periodicity::Weekly) && self.day_of_week.is_none() {
            Some(State::DayOfWeek)
        } else if self.reward.is_none() {
            Some(State::Reward)
        } else {
            None
        }
    }

    /// A complete draft ready for persistence.
    pub fn complete(&self) -> Option<HabitDraft> {
        let periodicity = self.periodicity?;
        let day_of_week = match periodicity {
            Periodicity::Daily => None,
            Periodicity::Weekly => Some(self.day_of_week?),
        };
        Some(HabitDraft {
            place: self.place.clone()?,
            time: self.time?,
            action: self.action.clone()?,
            execution_time_secs: self.execution_time_secs?,
            periodicity,
            day_of_week,
            reward: self.reward.clone()?,
            is_public: false,
        })
    }
}

/// What a successfully parsed turn leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Next(State),
    Confirmed(HabitDraft),
    Declined,
}

/// One in-progress conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: State,
    pub draft: Draft,
    /// Resolved when the conversation was entered.
    pub owner: User,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl Session {
    pub fn new(owner: User) -> Self {
        let now = Instant::now();
        Self {
            state: State::Place,
            draft: Draft::default(),
            owner,
            created_at: now,
            last_activity: now,
        }
    }

    /// Whether the session has been idle for longer than `ttl`.
    pub fn is_expired(&self, now: Instant, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => now.saturating_duration_since(self.last_activity) > ttl,
            None => false,
        }
    }

    /// Parse `text` for the current state and advance.
    ///
    /// On error nothing changes. On `Next` the session is already in the new state.
    pub fn apply(&mut self, text: &str) -> Result<Step, InputError> {
        match self.state {
            State::Place => self.draft.place = Some(parse::parse_place(text)?),
            State::Time => self.draft.time = Some(parse::parse_time(text)?),
            State::Action => self.draft.action = Some(parse::parse_action(text)?),
            State::ExecutionTime => {
                self.draft.execution_time_secs = Some(parse::parse_execution_time(text)?)
            }
            State::Periodicity => {
                let periodicity = parse::parse_periodicity(text)?;
                self.draft.periodicity = Some(periodicity);
                if periodicity == Periodicity::Daily {
                    self.draft.day_of_week = None;
                }
            }
            State::DayOfWeek => self.draft.day_of_week = Some(parse::parse_weekday(text)?),
            State::Reward => self.draft.reward = Some(parse::parse_reward(text)?),
            State::Confirm => {
                if !parse::parse_confirmation(text)? {
                    return Ok(Step::Declined);
                }
                return match self.draft.complete() {
                    Some(draft) => Ok(Step::Confirmed(draft)),
                    None => {
                        // Unreachable through normal transitions; resume collection.
                        self.state = self.draft.first_missing().unwrap_or(State::Place);
                        Ok(Step::Next(self.state))
                    }
                };
            }
        }
        self.state = self.draft.first_missing().unwrap_or(State::Confirm);
        Ok(Step::Next(self.state))
    }
}
