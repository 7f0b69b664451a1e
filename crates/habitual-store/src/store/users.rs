//! User lookup and lazy provisioning.

use super::Store;
use async_trait::async_trait;
use habitual_core::{error::HabitualError, habit::User, traits::UserDirectory};

type UserRow = (i64, String, Option<String>, String);

fn user_from_row((id, username, external_id, created_at): UserRow) -> User {
    User {
        id,
        username,
        external_id,
        created_at,
    }
}

#[async_trait]
impl UserDirectory for Store {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, HabitualError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, chat_id, created_at FROM users WHERE chat_id = ? LIMIT 1",
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HabitualError::Store(format!("find user failed: {e}")))?;

        Ok(row.map(user_from_row))
    }

    async fn create_user(
        &self,
        username: &str,
        external_id: &str,
        secret: &str,
    ) -> Result<User, HabitualError> {
        let result = sqlx::query("INSERT INTO users (username, chat_id, secret) VALUES (?, ?, ?)")
            .bind(username)
            .bind(external_id)
            .bind(secret)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    HabitualError::Conflict(format!("user {username} already exists"))
                }
                e => HabitualError::Store(format!("create user failed: {e}")),
            })?;

        let row: UserRow =
            sqlx::query_as("SELECT id, username, chat_id, created_at FROM users WHERE id = ?")
                .bind(result.last_insert_rowid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| HabitualError::Store(format!("reload user failed: {e}")))?;

        Ok(user_from_row(row))
    }
}
