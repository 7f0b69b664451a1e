//! Turn parsing: one function per collected field.
//!
//! All matching trims surrounding whitespace and ignores case. English and
//! Russian tokens are both accepted regardless of the reply language.

use chrono::{NaiveTime, Weekday};
use habitual_core::habit::{
    Periodicity, MAX_ACTION_LEN, MAX_EXECUTION_SECS, MAX_PLACE_LEN, MAX_REWARD_LEN,
    MIN_EXECUTION_SECS,
};
use thiserror::Error;

/// A recoverable problem with a single turn. The session stays where it is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("value is empty")]
    Empty,
    #[error("value is longer than {0} characters")]
    TooLong(usize),
    #[error("time is not HH:MM")]
    BadTime,
    #[error("not a number")]
    NotANumber,
    #[error("number out of range")]
    OutOfRange,
    #[error("unknown periodicity")]
    UnknownPeriodicity,
    #[error("unknown weekday")]
    UnknownWeekday,
    #[error("expected yes or no")]
    UnknownAnswer,
}

impl InputError {
    /// i18n key of the re-prompt for this error.
    pub fn retry_key(&self) -> &'static str {
        match self {
            Self::Empty => "retry_empty",
            Self::TooLong(_) => "retry_too_long",
            Self::BadTime => "retry_time",
            Self::NotANumber => "retry_number",
            Self::OutOfRange => "retry_range",
            Self::UnknownPeriodicity => "retry_periodicity",
            Self::UnknownWeekday => "retry_weekday",
            Self::UnknownAnswer => "retry_confirm",
        }
    }
}

fn bounded_text(input: &str, max: usize) -> Result<String, InputError> {
    let value = input.trim();
    if value.is_empty() {
        return Err(InputError::Empty);
    }
    if value.chars().count() > max {
        return Err(InputError::TooLong(max));
    }
    Ok(value.to_string())
}

pub fn parse_place(input: &str) -> Result<String, InputError> {
    bounded_text(input, MAX_PLACE_LEN)
}

pub fn parse_action(input: &str) -> Result<String, InputError> {
    bounded_text(input, MAX_ACTION_LEN)
}

/// `H:MM` or `HH:MM`, 24-hour clock.
pub fn parse_time(input: &str) -> Result<NaiveTime, InputError> {
    let (hours, minutes) = input.trim().split_once(':').ok_or(InputError::BadTime)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || hours.len() > 2 || !all_digits(minutes) || minutes.len() != 2 {
        return Err(InputError::BadTime);
    }
    let h: u32 = hours.parse().map_err(|_| InputError::BadTime)?;
    let m: u32 = minutes.parse().map_err(|_| InputError::BadTime)?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or(InputError::BadTime)
}

/// Whole seconds within the allowed execution range.
pub fn parse_execution_time(input: &str) -> Result<u32, InputError> {
    let n: i64 = input.trim().parse().map_err(|e: std::num::ParseIntError| {
        match e.kind() {
            std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                InputError::OutOfRange
            }
            _ => InputError::NotANumber,
        }
    })?;
    if n < i64::from(MIN_EXECUTION_SECS) || n > i64::from(MAX_EXECUTION_SECS) {
        return Err(InputError::OutOfRange);
    }
    u32::try_from(n).map_err(|_| InputError::OutOfRange)
}

pub fn parse_periodicity(input: &str) -> Result<Periodicity, InputError> {
    match input.trim().to_lowercase().as_str() {
        "daily" | "ежедневно" => Ok(Periodicity::Daily),
        "weekly" | "еженедельно" => Ok(Periodicity::Weekly),
        _ => Err(InputError::UnknownPeriodicity),
    }
}

pub fn parse_weekday(input: &str) -> Result<Weekday, InputError> {
    let day = match input.trim().to_lowercase().as_str() {
        "monday" | "mon" | "понедельник" | "пн" => Weekday::Mon,
        "tuesday" | "tue" | "вторник" | "вт" => Weekday::Tue,
        "wednesday" | "wed" | "среда" | "ср" => Weekday::Wed,
        "thursday" | "thu" | "четверг" | "чт" => Weekday::Thu,
        "friday" | "fri" | "пятница" | "пт" => Weekday::Fri,
        "saturday" | "sat" | "суббота" | "сб" => Weekday::Sat,
        "sunday" | "sun" | "воскресенье" | "вс" => Weekday::Sun,
        _ => return Err(InputError::UnknownWeekday),
    };
    Ok(day)
}

/// Free text, or the "none" sentinel which maps to an empty reward.
pub fn parse_reward(input: &str) -> Result<String, InputError> {
    let value = input.trim();
    if matches!(value.to_lowercase().as_str(), "none" | "нет") {
        return Ok(String::new());
    }
    if value.chars().count() > MAX_REWARD_LEN {
        return Err(InputError::TooLong(MAX_REWARD_LEN));
    }
    Ok(value.to_string())
}

pub fn parse_confirmation(input: &str) -> Result<bool, InputError> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" | "да" | "д" => Ok(true),
        "no" | "n" | "нет" | "н" => Ok(false),
        _ => Err(InputError::UnknownAnswer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_valid() {
        assert_eq!(parse_time("09:00"), Ok(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));
        assert_eq!(parse_time("9:05"), Ok(NaiveTime::from_hms_opt(9, 5, 0).unwrap()));
        assert_eq!(parse_time(" 23:59 "), Ok(NaiveTime::from_hms_opt(23, 59, 0).unwrap()));
        assert_eq!(parse_time("00:00"), Ok(NaiveTime::from_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_parse_time_invalid() {
        let inputs = [
            "25:61", "24:00", "12:60", "abc", "", "12", "12:5", "1:2:3", "+1:00", "123:00", "12:-1",
        ];
        for input in inputs {
            assert_eq!(parse_time(input), Err(InputError::BadTime), "input {input:?}");
        }
    }

    #[test]
    fn test_parse_execution_time() {
        assert_eq!(parse_execution_time("120"), Ok(120));
        assert_eq!(parse_execution_time(" 1 "), Ok(1));
        assert_eq!(parse_execution_time("121"), Err(InputError::OutOfRange));
        assert_eq!(parse_execution_time("0"), Err(InputError::OutOfRange));
        assert_eq!(parse_execution_time("-5"), Err(InputError::OutOfRange));
        assert_eq!(
            parse_execution_time("99999999999999999999"),
            Err(InputError::OutOfRange)
        );
        assert_eq!(parse_execution_time("ten"), Err(InputError::NotANumber));
        assert_eq!(parse_execution_time("1.5"), Err(InputError::NotANumber));
    }

    #[test]
    fn test_parse_periodicity_both_languages() {
        assert_eq!(parse_periodicity("Daily"), Ok(Periodicity::Daily));
        assert_eq!(parse_periodicity("ЕЖЕДНЕВНО"), Ok(Periodicity::Daily));
        assert_eq!(parse_periodicity("weekly"), Ok(Periodicity::Weekly));
        assert_eq!(parse_periodicity("Еженедельно"), Ok(Periodicity::Weekly));
        assert_eq!(parse_periodicity("monthly"), Err(InputError::UnknownPeriodicity));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Wednesday"), Ok(Weekday::Wed));
        assert_eq!(parse_weekday("wed"), Ok(Weekday::Wed));
        assert_eq!(parse_weekday("Среда"), Ok(Weekday::Wed));
        assert_eq!(parse_weekday("вс"), Ok(Weekday::Sun));
        assert_eq!(parse_weekday("funday"), Err(InputError::UnknownWeekday));
    }

    #[test]
    fn test_parse_reward_sentinel() {
        assert_eq!(parse_reward("нет"), Ok(String::new()));
        assert_eq!(parse_reward("None"), Ok(String::new()));
        assert_eq!(parse_reward("NONE"), Ok(String::new()));
        assert_eq!(parse_reward(" Coffee "), Ok("Coffee".to_string()));
        assert_eq!(parse_reward(""), Ok(String::new()));
        assert_eq!(
            parse_reward(&"x".repeat(MAX_REWARD_LEN + 1)),
            Err(InputError::TooLong(MAX_REWARD_LEN))
        );
    }

    #[test]
    fn test_parse_confirmation() {
        for yes in ["yes", "Y", "да", "Д"] {
            assert_eq!(parse_confirmation(yes), Ok(true));
        }
        for no in ["no", "N", "Нет", "н"] {
            assert_eq!(parse_confirmation(no), Ok(false));
        }
        assert_eq!(parse_confirmation("maybe"), Err(InputError::UnknownAnswer));
    }

    #[test]
    fn test_text_fields() {
        assert_eq!(parse_place("  Park "), Ok("Park".to_string()));
        assert_eq!(parse_place("   "), Err(InputError::Empty));
        assert_eq!(
            parse_action(&"a".repeat(MAX_ACTION_LEN + 1)),
            Err(InputError::TooLong(MAX_ACTION_LEN))
        );
        assert!(parse_action(&"a".repeat(MAX_ACTION_LEN)).is_ok());
    }

    #[test]
    fn test_retry_keys() {
        assert_eq!(InputError::BadTime.retry_key(), "retry_time");
        assert_eq!(InputError::TooLong(5).retry_key(), "retry_too_long");
    }
}
