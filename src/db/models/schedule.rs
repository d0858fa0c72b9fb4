use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// The single recurring trigger definition. Exactly one row exists in the
/// store at a time; saving a new one replaces the previous one whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub day: Weekday,
    pub time_of_day: NaiveTime,
    /// Weeks between runs. 1 means every matching weekday.
    pub interval_weeks: u32,
    /// When the last scheduled run started. Persisted so the interval check
    /// survives process restarts.
    pub last_run_at: Option<DateTime<Utc>>,
}

impl ScheduleConfig {
    /// Build from the plain strings the configuration surface hands over,
    /// e.g. `("Monday", "09:00", 1)`.
    pub fn parse(day: &str, time_of_day: &str, interval_weeks: u32) -> Result<Self, TrackerError> {
        if interval_weeks == 0 {
            return Err(TrackerError::Config(
                "interval_weeks must be at least 1".into(),
            ));
        }
        Ok(Self {
            day: parse_weekday(day)?,
            time_of_day: parse_time_of_day(time_of_day)?,
            interval_weeks,
            last_run_at: None,
        })
    }

    pub fn day_str(&self) -> &'static str {
        weekday_str(self.day)
    }

    pub fn time_str(&self) -> String {
        self.time_of_day.format("%H:%M").to_string()
    }
}

pub fn weekday_str(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_weekday(value: &str) -> Result<Weekday, TrackerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Mon),
        "tuesday" | "tue" => Ok(Weekday::Tue),
        "wednesday" | "wed" => Ok(Weekday::Wed),
        "thursday" | "thu" => Ok(Weekday::Thu),
        "friday" | "fri" => Ok(Weekday::Fri),
        "saturday" | "sat" => Ok(Weekday::Sat),
        "sunday" | "sun" => Ok(Weekday::Sun),
        other => Err(TrackerError::Config(format!("unknown weekday '{other}'"))),
    }
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TrackerError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| TrackerError::Config(format!("invalid time of day '{value}', expected HH:MM")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_and_time() {
        let cfg = ScheduleConfig::parse("Monday", "09:00", 1).unwrap();
        assert_eq!(cfg.day, Weekday::Mon);
        assert_eq!(cfg.time_str(), "09:00");
        assert_eq!(cfg.interval_weeks, 1);
        assert!(cfg.last_run_at.is_none());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ScheduleConfig::parse("Funday", "09:00", 1).is_err());
        assert!(ScheduleConfig::parse("Monday", "9 o'clock", 1).is_err());
        assert!(ScheduleConfig::parse("Monday", "09:00", 0).is_err());
    }

    #[test]
    fn weekday_roundtrip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(parse_weekday(weekday_str(day)).unwrap(), day);
        }
    }
}
