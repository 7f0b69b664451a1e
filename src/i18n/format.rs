//! Format helpers for strings with interpolation.

use super::t;
use chrono::{NaiveTime, Weekday};
use habitual_core::habit::{Habit, HabitDraft, Periodicity, PublicHabit};

fn hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Localized weekday name.
pub fn weekday_name(lang: &str, day: Weekday) -> &'static str {
    match (lang, day) {
        ("Russian", Weekday::Mon) => "Понедельник",
        ("Russian", Weekday::Tue) => "Вторник",
        ("Russian", Weekday::Wed) => "Среда",
        ("Russian", Weekday::Thu) => "Четверг",
        ("Russian", Weekday::Fri) => "Пятница",
        ("Russian", Weekday::Sat) => "Суббота",
        ("Russian", Weekday::Sun) => "Воскресенье",
        (_, Weekday::Mon) => "Monday",
        (_, Weekday::Tue) => "Tuesday",
        (_, Weekday::Wed) => "Wednesday",
        (_, Weekday::Thu) => "Thursday",
        (_, Weekday::Fri) => "Friday",
        (_, Weekday::Sat) => "Saturday",
        (_, Weekday::Sun) => "Sunday",
    }
}

/// "daily", or "weekly (Wednesday)" when the day is known.
pub fn recurrence_label(lang: &str, periodicity: Periodicity, day: Option<Weekday>) -> String {
    match (periodicity, day) {
        (Periodicity::Daily, _) => t("daily_label", lang).to_string(),
        (Periodicity::Weekly, Some(day)) => {
            format!("{} ({})", t("weekly_label", lang), weekday_name(lang, day))
        }
        (Periodicity::Weekly, None) => t("weekly_label", lang).to_string(),
    }
}

/// Greeting for a user who was just registered.
pub fn welcome_new(lang: &str, first_name: &str, username: &str) -> String {
    let commands = t("commands_list", lang);
    match lang {
        "Russian" => format!(
            "Привет, {first_name}!\nВы зарегистрированы в Habit Tracker!\nВаш логин: {username}\n\n{commands}"
        ),
        _ => format!(
            "Hi, {first_name}!\nYou are registered with Habit Tracker!\nYour login: {username}\n\n{commands}"
        ),
    }
}

/// Greeting for a returning user.
pub fn welcome_back(lang: &str, username: &str) -> String {
    let commands = t("commands_list", lang);
    match lang {
        "Russian" => format!("С возвращением, {username}!\n\n{commands}"),
        _ => format!("Welcome back, {username}!\n\n{commands}"),
    }
}

/// Summary shown before the final yes/no confirmation.
pub fn draft_summary(lang: &str, draft: &HabitDraft) -> String {
    let reward = if draft.reward.is_empty() {
        t("none_label", lang)
    } else {
        draft.reward.as_str()
    };
    let recurrence = recurrence_label(lang, draft.periodicity, draft.day_of_week);
    let question = t("confirm_question", lang);
    let (place, time, action) = (&draft.place, hhmm(draft.time), &draft.action);
    let secs = draft.execution_time_secs;
    match lang {
        "Russian" => format!(
            "ПОДТВЕРЖДЕНИЕ ПРИВЫЧКИ:\n\n\
             Место: {place}\n\
             Время: {time}\n\
             Действие: {action}\n\
             Длительность: {secs} сек.\n\
             Периодичность: {recurrence}\n\
             Вознаграждение: {reward}\n\n\
             {question}"
        ),
        _ => format!(
            "CONFIRM HABIT:\n\n\
             Place: {place}\n\
             Time: {time}\n\
             Action: {action}\n\
             Duration: {secs} sec.\n\
             Periodicity: {recurrence}\n\
             Reward: {reward}\n\n\
             {question}"
        ),
    }
}

/// Success message after a habit was stored.
pub fn habit_created(lang: &str, habit: &Habit) -> String {
    let recurrence = recurrence_label(lang, habit.periodicity, habit.day_of_week);
    let (id, action, time, place) = (habit.id, &habit.action, hhmm(habit.time), &habit.place);
    match lang {
        "Russian" => format!(
            "Привычка создана успешно!\n\n\
             ID привычки: {id}\n\
             {action}\n\
             в {time} в {place}\n\
             {recurrence}\n\n\
             Вы получите напоминание в указанное время!"
        ),
        _ => format!(
            "Habit created!\n\n\
             Habit ID: {id}\n\
             {action}\n\
             at {time} in {place}\n\
             {recurrence}\n\n\
             You will get a reminder at that time!"
        ),
    }
}

/// Terminal error when storing the confirmed habit failed.
pub fn create_failed(lang: &str, reason: &str) -> String {
    match lang {
        "Russian" => format!("Ошибка при создании привычки: {reason}"),
        _ => format!("Failed to create the habit: {reason}"),
    }
}

/// Numbered list of the user's own habits.
pub fn habit_list(lang: &str, habits: &[Habit]) -> String {
    let mut out = format!("{}\n\n", t("your_habits", lang));
    for (i, habit) in habits.iter().enumerate() {
        let recurrence = recurrence_label(lang, habit.periodicity, habit.day_of_week);
        let at = if lang == "Russian" { "в" } else { "at" };
        let secs_label = if lang == "Russian" { "сек." } else { "sec." };
        out.push_str(&format!(
            "{}. {}\n   {} {at} {}\n   {} {secs_label} | {recurrence}",
            i + 1,
            habit.action,
            hhmm(habit.time),
            habit.place,
            habit.execution_time_secs,
        ));
        if !habit.reward.is_empty() {
            let label = if lang == "Russian" {
                "Вознаграждение"
            } else {
                "Reward"
            };
            out.push_str(&format!("\n   {label}: {}", habit.reward));
        }
        out.push_str("\n\n");
    }
    out.trim_end().to_string()
}

/// Numbered list of public habits with their owners.
pub fn public_list(lang: &str, habits: &[PublicHabit]) -> String {
    let mut out = format!("{}\n\n", t("public_habits", lang));
    let at = if lang == "Russian" { "в" } else { "at" };
    let secs_label = if lang == "Russian" { "сек." } else { "sec." };
    for (i, entry) in habits.iter().enumerate() {
        let habit = &entry.habit;
        let recurrence = recurrence_label(lang, habit.periodicity, habit.day_of_week);
        out.push_str(&format!(
            "{}. {}\n   {}\n   {} {at} {}\n   {} {secs_label} | {recurrence}\n\n",
            i + 1,
            habit.action,
            entry.username,
            hhmm(habit.time),
            habit.place,
            habit.execution_time_secs,
        ));
    }
    out.trim_end().to_string()
}

/// The reminder delivered when a habit is due.
pub fn reminder(lang: &str, habit: &Habit) -> String {
    let (action, time, place, secs) = (
        &habit.action,
        hhmm(habit.time),
        &habit.place,
        habit.execution_time_secs,
    );
    match lang {
        "Russian" => format!(
            "🔔 Напоминание о привычке!\n\n\
             Привычка: {action}\n\
             Время: {time}\n\
             Место: {place}\n\
             Время на выполнение: {secs} сек."
        ),
        _ => format!(
            "🔔 Habit reminder!\n\n\
             Habit: {action}\n\
             Time: {time}\n\
             Place: {place}\n\
             Time to complete: {secs} sec."
        ),
    }
}
