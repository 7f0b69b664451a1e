use super::*;
use chrono::{NaiveTime, Weekday};
use habitual_core::habit::{Habit, HabitDraft, Periodicity, PublicHabit};

const KEYS: &[&str] = &[
    "prompt_place",
    "prompt_time",
    "prompt_action",
    "prompt_execution_time",
    "prompt_periodicity",
    "prompt_day_of_week",
    "prompt_reward",
    "confirm_question",
    "retry_empty",
    "retry_too_long",
    "retry_time",
    "retry_number",
    "retry_range",
    "retry_periodicity",
    "retry_weekday",
    "retry_confirm",
    "choice_daily",
    "choice_weekly",
    "choice_yes",
    "choice_no",
    "habit_cancelled",
    "nothing_to_cancel",
    "not_registered",
    "no_habits",
    "no_public_habits",
    "your_habits",
    "public_habits",
    "error_generic",
    "unknown_command",
    "text_hint",
    "commands_list",
    "help",
    "none_label",
    "daily_label",
    "weekly_label",
];

fn habit() -> Habit {
    Habit {
        id: 7,
        user_id: 1,
        owner_chat_id: Some("100".into()),
        place: "Park".into(),
        time: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
        action: "Jog".into(),
        execution_time_secs: 120,
        periodicity: Periodicity::Weekly,
        day_of_week: Some(Weekday::Wed),
        reward: String::new(),
        is_public: true,
        created_at: "2026-01-01 00:00:00".into(),
    }
}

#[test]
fn test_all_keys_have_english_and_russian() {
    for key in KEYS {
        let en = t(key, "English");
        let ru = t(key, "Russian");
        assert_ne!(en, "???", "missing English text for {key}");
        assert_ne!(ru, "???", "missing Russian text for {key}");
        assert_ne!(en, ru, "Russian text for {key} is not translated");
    }
}

#[test]
fn test_unknown_language_falls_back_to_english() {
    assert_eq!(t("help", "Klingon"), t("help", "English"));
    assert_eq!(weekday_name("Klingon", Weekday::Fri), "Friday");
}

#[test]
fn test_unknown_key() {
    assert_eq!(t("no_such_key", "English"), "???");
}

#[test]
fn test_recurrence_label() {
    assert_eq!(recurrence_label("English", Periodicity::Daily, None), "daily");
    assert_eq!(
        recurrence_label("English", Periodicity::Weekly, Some(Weekday::Wed)),
        "weekly (Wednesday)"
    );
    assert_eq!(
        recurrence_label("Russian", Periodicity::Weekly, Some(Weekday::Sun)),
        "еженедельно (Воскресенье)"
    );
}

#[test]
fn test_draft_summary_shows_none_for_empty_reward() {
    let draft = HabitDraft {
        place: "Home".into(),
        time: NaiveTime::from_hms_opt(7, 5, 0).unwrap(),
        action: "Meditate".into(),
        execution_time_secs: 60,
        periodicity: Periodicity::Daily,
        day_of_week: None,
        reward: String::new(),
        is_public: false,
    };
    let text = draft_summary("English", &draft);
    assert!(text.contains("Time: 07:05"));
    assert!(text.contains("Duration: 60 sec."));
    assert!(text.contains("Reward: none"));
    assert!(text.ends_with("(yes/no)"));

    let ru = draft_summary("Russian", &draft);
    assert!(ru.contains("Вознаграждение: нет"));
}

#[test]
fn test_reminder_contains_habit_details() {
    let text = reminder("English", &habit());
    assert!(text.contains("Habit: Jog"));
    assert!(text.contains("Time: 18:30"));
    assert!(text.contains("Place: Park"));
    assert!(text.contains("120 sec."));
}

#[test]
fn test_habit_list_numbering_and_reward() {
    let mut second = habit();
    second.action = "Stretch".into();
    second.reward = "Tea".into();
    let text = habit_list("English", &[habit(), second]);
    assert!(text.starts_with("YOUR HABITS:"));
    assert!(text.contains("1. Jog"));
    assert!(text.contains("2. Stretch"));
    assert!(text.contains("Reward: Tea"));
    assert_eq!(text.matches("Reward:").count(), 1);
}

#[test]
fn test_public_list_includes_usernames() {
    let entry = PublicHabit {
        habit: habit(),
        username: "telegram_ann".into(),
    };
    let text = public_list("English", &[entry]);
    assert!(text.contains("1. Jog"));
    assert!(text.contains("telegram_ann"));
}

#[test]
fn test_welcome_texts() {
    let text = welcome_new("English", "Ann", "telegram_ann");
    assert!(text.contains("Hi, Ann!"));
    assert!(text.contains("telegram_ann"));
    assert!(text.contains("/create"));
    assert!(welcome_back("Russian", "telegram_ann").contains("С возвращением"));
}
