//! Tests for the Telegram channel module.

use super::polling::{incoming_from_update, Backoff};
use super::send::{classify_send_failure, reply_markup, split_chunks};
use super::types::*;
use habitual_core::message::Keyboard;
use reqwest::StatusCode;

fn update(json: &str) -> TgUpdate {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_split_short_message() {
    let chunks = split_chunks("hello", 4096);
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn test_split_long_message() {
    let text = "a\n".repeat(3000);
    let chunks = split_chunks(&text, 4096);
    assert!(chunks.len() >= 2);
    for chunk in &chunks {
        assert!(chunk.len() <= 4096);
    }
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_split_respects_utf8_boundaries() {
    // Cyrillic letters are two bytes each; an odd limit would cut one in half.
    let text = "привычка".repeat(100);
    let chunks = split_chunks(&text, 101);
    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn test_private_text_message_becomes_incoming() {
    let upd = update(
        r#"{
            "update_id": 10,
            "message": {
                "message_id": 1,
                "from": {"id": 555, "first_name": "Ann", "username": "ann_h"},
                "chat": {"id": 555, "type": "private"},
                "text": "/start"
            }
        }"#,
    );
    let msg = incoming_from_update(upd, &[]).unwrap();
    assert_eq!(msg.channel, "telegram");
    assert_eq!(msg.sender_id, "555");
    assert_eq!(msg.sender_name.as_deref(), Some("Ann"));
    assert_eq!(msg.sender_handle.as_deref(), Some("ann_h"));
    assert_eq!(msg.text, "/start");
    assert_eq!(msg.reply_target.as_deref(), Some("555"));
    assert_eq!(msg.chat_key(), "555");
}

#[test]
fn test_group_messages_are_dropped() {
    let upd = update(
        r#"{
            "update_id": 11,
            "message": {
                "from": {"id": 1, "first_name": "G"},
                "chat": {"id": -100123, "type": "supergroup"},
                "text": "hi"
            }
        }"#,
    );
    assert!(incoming_from_update(upd, &[]).is_none());
}

#[test]
fn test_non_text_updates_are_dropped() {
    let upd = update(
        r#"{
            "update_id": 12,
            "message": {
                "from": {"id": 1, "first_name": "V"},
                "chat": {"id": 1, "type": "private"}
            }
        }"#,
    );
    assert!(incoming_from_update(upd, &[]).is_none());

    let no_message = update(r#"{"update_id": 13}"#);
    assert!(incoming_from_update(no_message, &[]).is_none());
}

#[test]
fn test_allowed_users_filter() {
    let json = r#"{
        "update_id": 14,
        "message": {
            "from": {"id": 7, "first_name": "X"},
            "chat": {"id": 7, "type": "private"},
            "text": "hello"
        }
    }"#;
    assert!(incoming_from_update(update(json), &[8, 9]).is_none());
    assert!(incoming_from_update(update(json), &[7]).is_some());
}

#[test]
fn test_split_breaks_after_newline() {
    let chunks = split_chunks("ab\ncdef", 5);
    assert_eq!(chunks, vec!["ab\n", "cdef"]);
}

#[test]
fn test_split_empty_text_sends_one_chunk() {
    assert_eq!(split_chunks("", 10), vec![""]);
}

#[test]
fn test_backoff_doubles_up_to_a_minute_and_resets() {
    let mut backoff = Backoff::new();
    let secs: Vec<u64> = (0..8).map(|_| backoff.next_delay().as_secs()).collect();
    assert_eq!(secs, vec![1, 2, 4, 8, 16, 32, 60, 60]);
    backoff.reset();
    assert_eq!(backoff.next_delay().as_secs(), 1);
}

#[test]
fn test_endpoint_includes_token_and_method() {
    assert_eq!(
        super::api_endpoint("123:abc", "getUpdates"),
        "https://api.telegram.org/bot123:abc/getUpdates"
    );
}

#[test]
fn test_tg_chat_type_defaults_when_missing() {
    let chat: TgChat = serde_json::from_str(r#"{"id": 123}"#).unwrap();
    assert_eq!(chat.chat_type, "");
}

#[test]
fn test_reply_markup_shapes() {
    assert!(reply_markup(&Keyboard::Keep).is_none());

    let markup = reply_markup(&Keyboard::choices(&[&["Yes", "No"]])).unwrap();
    assert_eq!(markup["keyboard"][0][1], "No");
    assert_eq!(markup["one_time_keyboard"], true);

    let remove = reply_markup(&Keyboard::Remove).unwrap();
    assert_eq!(remove["remove_keyboard"], true);
}

#[test]
fn test_send_failure_classification() {
    assert!(classify_send_failure(StatusCode::TOO_MANY_REQUESTS, "slow down").is_transient());
    assert!(classify_send_failure(StatusCode::BAD_GATEWAY, "").is_transient());
    assert!(!classify_send_failure(StatusCode::FORBIDDEN, "bot was blocked").is_transient());
    assert!(!classify_send_failure(StatusCode::BAD_REQUEST, "chat not found").is_transient());
}
