use super::Store;
use chrono::{NaiveTime, Weekday};
use habitual_core::error::HabitualError;
use habitual_core::habit::{HabitDraft, Periodicity};
use habitual_core::traits::{HabitRepository, UserDirectory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn draft(action: &str, hour: u32, minute: u32) -> HabitDraft {
    HabitDraft {
        place: "Home".to_string(),
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        action: action.to_string(),
        execution_time_secs: 90,
        periodicity: Periodicity::Daily,
        day_of_week: None,
        reward: String::new(),
        is_public: false,
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(store.pool()).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_create_and_find_user() {
    let store = test_store().await;
    assert!(store.find_by_external_id("100").await.unwrap().is_none());

    let user = store
        .create_user("telegram_alice", "100", "s3cret")
        .await
        .unwrap();
    assert_eq!(user.username, "telegram_alice");
    assert_eq!(user.external_id.as_deref(), Some("100"));

    let found = store.find_by_external_id("100").await.unwrap().unwrap();
    assert_eq!(found, user);
}

#[tokio::test]
async fn test_duplicate_username_is_conflict() {
    let store = test_store().await;
    store.create_user("telegram_bob", "1", "x").await.unwrap();
    let err = store.create_user("telegram_bob", "2", "y").await.unwrap_err();
    assert!(matches!(err, HabitualError::Conflict(_)));
}

#[tokio::test]
async fn test_create_habit_roundtrip() {
    let store = test_store().await;
    let user = store.create_user("u", "42", "x").await.unwrap();

    let mut d = draft("Read a book", 9, 30);
    d.periodicity = Periodicity::Weekly;
    d.day_of_week = Some(Weekday::Wed);
    d.reward = "Coffee".to_string();

    let habit = store.create_habit(&user, &d).await.unwrap();
    assert_eq!(habit.user_id, user.id);
    assert_eq!(habit.owner_chat_id.as_deref(), Some("42"));
    assert_eq!(habit.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    assert_eq!(habit.periodicity, Periodicity::Weekly);
    assert_eq!(habit.day_of_week, Some(Weekday::Wed));
    assert_eq!(habit.reward, "Coffee");
    assert_eq!(habit.execution_time_secs, 90);
    assert!(!habit.is_public);

    let loaded = store.get_habit(habit.id).await.unwrap().unwrap();
    assert_eq!(loaded, habit);
}

#[tokio::test]
async fn test_create_habit_rejects_invalid_draft() {
    let store = test_store().await;
    let user = store.create_user("u", "42", "x").await.unwrap();

    let mut d = draft("Run", 7, 0);
    d.execution_time_secs = 121;
    let err = store.create_habit(&user, &d).await.unwrap_err();
    assert!(matches!(err, HabitualError::Validation(_)));

    let (_, habits) = store.counts().await.unwrap();
    assert_eq!(habits, 0);
}

#[tokio::test]
async fn test_get_missing_habit() {
    let store = test_store().await;
    assert!(store.get_habit(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_by_user_ordered_by_time_and_limited() {
    let store = test_store().await;
    let alice = store.create_user("alice", "1", "x").await.unwrap();
    let bob = store.create_user("bob", "2", "x").await.unwrap();

    store.create_habit(&alice, &draft("Evening walk", 19, 0)).await.unwrap();
    store.create_habit(&alice, &draft("Morning run", 6, 45)).await.unwrap();
    store.create_habit(&alice, &draft("Lunch stretch", 12, 0)).await.unwrap();
    store.create_habit(&bob, &draft("Bob's habit", 8, 0)).await.unwrap();

    let habits = store.list_by_user(alice.id, 10).await.unwrap();
    let actions: Vec<_> = habits.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["Morning run", "Lunch stretch", "Evening walk"]);

    let limited = store.list_by_user(alice.id, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_list_public_newest_first_with_usernames() {
    let store = test_store().await;
    let alice = store.create_user("alice", "1", "x").await.unwrap();

    let mut first = draft("First public", 8, 0);
    first.is_public = true;
    let mut second = draft("Second public", 9, 0);
    second.is_public = true;
    store.create_habit(&alice, &first).await.unwrap();
    store.create_habit(&alice, &draft("Private", 10, 0)).await.unwrap();
    store.create_habit(&alice, &second).await.unwrap();

    let public = store.list_public(5).await.unwrap();
    assert_eq!(public.len(), 2);
    assert_eq!(public[0].habit.action, "Second public");
    assert_eq!(public[1].habit.action, "First public");
    assert!(public.iter().all(|p| p.username == "alice"));

    assert_eq!(store.list_public(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_schedules_skip_owners_without_target() {
    let store = test_store().await;
    let reachable = store.create_user("reachable", "77", "x").await.unwrap();
    store.create_habit(&reachable, &draft("Notify me", 9, 0)).await.unwrap();

    sqlx::query("INSERT INTO users (username, chat_id, secret) VALUES ('web_only', NULL, 'x')")
        .execute(store.pool())
        .await
        .unwrap();
    let (web_id,): (i64,) = sqlx::query_as("SELECT id FROM users WHERE username = 'web_only'")
        .fetch_one(store.pool())
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO habits (user_id, place, time, action) VALUES (?, 'Desk', '09:00:00', 'Silent')",
    )
    .bind(web_id)
    .execute(store.pool())
    .await
    .unwrap();

    let schedules = store.list_all_schedules().await.unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].owner_chat_id.as_deref(), Some("77"));
    assert_eq!(schedules[0].time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
}

#[tokio::test]
async fn test_deleting_user_cascades_to_habits() {
    let store = test_store().await;
    let user = store.create_user("gone", "5", "x").await.unwrap();
    let habit = store.create_habit(&user, &draft("Ephemeral", 9, 0)).await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user.id)
        .execute(store.pool())
        .await
        .unwrap();

    assert!(store.get_habit(habit.id).await.unwrap().is_none());
    assert!(store.list_all_schedules().await.unwrap().is_empty());
}
