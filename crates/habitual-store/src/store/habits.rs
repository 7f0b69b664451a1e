//! Habit CRUD, listings, and recurrence snapshots for the scheduler.

use super::Store;
use async_trait::async_trait;
use chrono::NaiveTime;
use habitual_core::{
    error::HabitualError,
    habit::{weekday_from_number, Habit, HabitDraft, HabitSchedule, Periodicity, PublicHabit, User},
    traits::HabitRepository,
};

/// Column list shared by every habit query; the owner is always joined in.
const HABIT_SELECT: &str = "SELECT h.id, h.user_id, u.chat_id, h.place, h.time, h.action, \
     h.execution_time, h.periodicity, h.day_of_week, h.reward, h.is_public, h.created_at, \
     u.username \
     FROM habits h JOIN users u ON u.id = h.user_id";

type HabitRow = (
    i64,
    i64,
    Option<String>,
    String,
    String,
    String,
    i64,
    String,
    Option<i64>,
    String,
    i64,
    String,
    String,
);

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn parse_time(raw: &str) -> Result<NaiveTime, HabitualError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| HabitualError::Store(format!("corrupt habit time {raw:?}: {e}")))
}

fn parse_periodicity(raw: &str) -> Result<Periodicity, HabitualError> {
    Periodicity::from_db(raw)
        .ok_or_else(|| HabitualError::Store(format!("corrupt periodicity {raw:?}")))
}

/// Convert a joined row into a habit and its owner's username.
fn habit_from_row(row: HabitRow) -> Result<(Habit, String), HabitualError> {
    let (
        id,
        user_id,
        owner_chat_id,
        place,
        time,
        action,
        execution_time,
        periodicity,
        day_of_week,
        reward,
        is_public,
        created_at,
        username,
    ) = row;
    let habit = Habit {
        id,
        user_id,
        owner_chat_id,
        place,
        time: parse_time(&time)?,
        action,
        execution_time_secs: u32::try_from(execution_time)
            .map_err(|_| HabitualError::Store(format!("corrupt execution time {execution_time}")))?,
        periodicity: parse_periodicity(&periodicity)?,
        day_of_week: day_of_week.and_then(weekday_from_number),
        reward,
        is_public: is_public != 0,
        created_at,
    };
    Ok((habit, username))
}

#[async_trait]
impl HabitRepository for Store {
    async fn create_habit(&self, owner: &User, draft: &HabitDraft) -> Result<Habit, HabitualError> {
        draft.validate()?;

        let result = sqlx::query(
            "INSERT INTO habits \
             (user_id, place, time, action, execution_time, periodicity, day_of_week, reward, is_public) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner.id)
        .bind(draft.place.trim())
        .bind(format_time(draft.time))
        .bind(draft.action.trim())
        .bind(draft.execution_time_secs as i64)
        .bind(draft.periodicity.as_str())
        .bind(draft.day_of_week.map(|d| d.number_from_monday() as i64))
        .bind(draft.reward.trim())
        .bind(draft.is_public as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| HabitualError::Store(format!("create habit failed: {e}")))?;

        let id = result.last_insert_rowid();
        self.get_habit(id)
            .await?
            .ok_or_else(|| HabitualError::Store(format!("habit {id} vanished after insert")))
    }

    async fn get_habit(&self, id: i64) -> Result<Option<Habit>, HabitualError> {
        let row: Option<HabitRow> = sqlx::query_as(&format!("{HABIT_SELECT} WHERE h.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HabitualError::Store(format!("get habit failed: {e}")))?;

        row.map(|r| habit_from_row(r).map(|(habit, _)| habit))
            .transpose()
    }

    async fn list_by_user(&self, user_id: i64, limit: usize) -> Result<Vec<Habit>, HabitualError> {
        let rows: Vec<HabitRow> = sqlx::query_as(&format!(
            "{HABIT_SELECT} WHERE h.user_id = ? ORDER BY h.time ASC, h.id ASC LIMIT ?"
        ))
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HabitualError::Store(format!("list habits failed: {e}")))?;

        rows.into_iter()
            .map(|r| habit_from_row(r).map(|(habit, _)| habit))
            .collect()
    }

    async fn list_public(&self, limit: usize) -> Result<Vec<PublicHabit>, HabitualError> {
        let rows: Vec<HabitRow> = sqlx::query_as(&format!(
            "{HABIT_SELECT} WHERE h.is_public = 1 ORDER BY h.created_at DESC, h.id DESC LIMIT ?"
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HabitualError::Store(format!("list public habits failed: {e}")))?;

        rows.into_iter()
            .map(|r| habit_from_row(r).map(|(habit, username)| PublicHabit { habit, username }))
            .collect()
    }

    async fn list_all_schedules(&self) -> Result<Vec<HabitSchedule>, HabitualError> {
        let rows: Vec<(i64, String, String, String, Option<i64>)> = sqlx::query_as(
            "SELECT h.id, u.chat_id, h.time, h.periodicity, h.day_of_week \
             FROM habits h JOIN users u ON u.id = h.user_id \
             WHERE u.chat_id IS NOT NULL AND u.chat_id != ''",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HabitualError::Store(format!("list schedules failed: {e}")))?;

        // Corrupt rows are skipped with a warning.
        let mut schedules = Vec::with_capacity(rows.len());
        for (habit_id, chat_id, time, periodicity, day_of_week) in rows {
            match (parse_time(&time), parse_periodicity(&periodicity)) {
                (Ok(time), Ok(periodicity)) => schedules.push(HabitSchedule {
                    habit_id,
                    owner_chat_id: Some(chat_id),
                    time,
                    periodicity,
                    day_of_week: day_of_week.and_then(weekday_from_number),
                }),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("skipping habit {habit_id} in schedule snapshot: {e}");
                }
            }
        }
        Ok(schedules)
    }
}
