//! Chat identity bridge: maps an external chat id to an internal user.

use habitual_core::{error::HabitualError, habit::User, traits::UserDirectory};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of [`ChatIdentityBridge::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub user: User,
    /// `false` when the chat was already linked to a user.
    pub created: bool,
}

/// Resolves chat identities, provisioning users on first contact.
#[derive(Clone)]
pub struct ChatIdentityBridge {
    users: Arc<dyn UserDirectory>,
}

impl ChatIdentityBridge {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// The user linked to `chat_id`, if any.
    pub async fn resolve(&self, chat_id: &str) -> Result<Option<User>, HabitualError> {
        self.users.find_by_external_id(chat_id).await
    }

    /// Link `chat_id` to a user, creating one if needed.
    ///
    /// New users are named `telegram_<handle>`, or `telegram_<chat_id>` when
    /// there is no handle or the handle-based name is already taken.
    pub async fn register(
        &self,
        chat_id: &str,
        handle: Option<&str>,
    ) -> Result<Registration, HabitualError> {
        if let Some(user) = self.resolve(chat_id).await? {
            return Ok(Registration {
                user,
                created: false,
            });
        }

        let handle = handle.map(str::trim).filter(|h| !h.is_empty());
        let username = format!("telegram_{}", handle.unwrap_or(chat_id));
        match self.create(&username, chat_id).await {
            Ok(user) => Ok(Registration {
                user,
                created: true,
            }),
            Err(HabitualError::Conflict(reason)) => {
                // A concurrent /start from the same chat may have won the race.
                if let Some(user) = self.resolve(chat_id).await? {
                    return Ok(Registration {
                        user,
                        created: false,
                    });
                }
                let fallback = format!("telegram_{chat_id}");
                if fallback == username {
                    return Err(HabitualError::Conflict(reason));
                }
                warn!("username {username} is taken, registering chat {chat_id} as {fallback}");
                let user = self.create(&fallback, chat_id).await?;
                Ok(Registration {
                    user,
                    created: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn create(&self, username: &str, chat_id: &str) -> Result<User, HabitualError> {
        let secret = Uuid::new_v4().simple().to_string();
        let user = self.users.create_user(username, chat_id, &secret).await?;
        info!("registered user {} for chat {chat_id}", user.username);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeUsers {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserDirectory for FakeUsers {
        async fn find_by_external_id(
            &self,
            external_id: &str,
        ) -> Result<Option<User>, HabitualError> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| u.external_id.as_deref() == Some(external_id))
                .cloned())
        }

        async fn create_user(
            &self,
            username: &str,
            external_id: &str,
            secret: &str,
        ) -> Result<User, HabitualError> {
            assert_eq!(secret.len(), 32);
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == username) {
                return Err(HabitualError::Conflict(username.to_string()));
            }
            let user = User {
                id: users.len() as i64 + 1,
                username: username.to_string(),
                external_id: Some(external_id.to_string()),
                created_at: "2026-01-01 00:00:00".to_string(),
            };
            users.push(user.clone());
            Ok(user)
        }
    }

    fn bridge() -> (ChatIdentityBridge, Arc<FakeUsers>) {
        let users = Arc::new(FakeUsers::default());
        (ChatIdentityBridge::new(users.clone()), users)
    }

    #[tokio::test]
    async fn test_resolve_unknown_chat() {
        let (bridge, _) = bridge();
        assert!(bridge.resolve("100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_uses_handle() {
        let (bridge, _) = bridge();
        let reg = bridge.register("100", Some("alice")).await.unwrap();
        assert!(reg.created);
        assert_eq!(reg.user.username, "telegram_alice");
        assert_eq!(bridge.resolve("100").await.unwrap(), Some(reg.user));
    }

    #[tokio::test]
    async fn test_register_without_handle_uses_chat_id() {
        let (bridge, _) = bridge();
        let reg = bridge.register("100", None).await.unwrap();
        assert_eq!(reg.user.username, "telegram_100");

        let reg = bridge.register("200", Some("  ")).await.unwrap();
        assert_eq!(reg.user.username, "telegram_200");
    }

    #[tokio::test]
    async fn test_register_twice_returns_existing() {
        let (bridge, users) = bridge();
        let first = bridge.register("100", Some("alice")).await.unwrap();
        let second = bridge.register("100", Some("alice")).await.unwrap();
        assert!(!second.created);
        assert_eq!(first.user, second.user);
        assert_eq!(users.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_falls_back_on_taken_handle() {
        let (bridge, _) = bridge();
        bridge.register("100", Some("alice")).await.unwrap();
        let reg = bridge.register("200", Some("alice")).await.unwrap();
        assert!(reg.created);
        assert_eq!(reg.user.username, "telegram_200");
    }
}
