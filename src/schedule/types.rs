use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SchedulerError};
use super::slot_utils::{minutes_to_time_string, parse_time_to_minutes};

/// Key format used for dates everywhere a date is rendered or parsed
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A bookable time of day, kept as minutes since midnight so ordering is numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    minutes: u16,
}

impl Slot {
    /// # Panics
    /// Panics if `hour >= 24` or `minute >= 60`.
    pub const fn at(hour: u16, minute: u16) -> Self {
        assert!(hour < 24 && minute < 60, "slot out of range");
        Self { minutes: hour * 60 + minute }
    }

    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes >= 24 * 60 {
            return Err(SchedulerError::InvalidSlot(minutes.to_string()));
        }
        Ok(Self { minutes })
    }

    pub fn minutes(self) -> u16 {
        self.minutes
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&minutes_to_time_string(self.minutes))
    }
}

impl FromStr for Slot {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_to_minutes(s)
            .map(|minutes| Slot { minutes })
            .ok_or_else(|| SchedulerError::InvalidSlot(s.trim().to_string()))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Spacing between consecutive slots of the business day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    #[default]
    Hourly,
    HalfHour,
}

impl Granularity {
    pub fn step_minutes(self) -> u16 {
        match self {
            Granularity::Hourly => 60,
            Granularity::HalfHour => 30,
        }
    }
}

/// One booked slot on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reservation {
    pub date: NaiveDate,
    pub slot: Slot,
}

/// Parses a date key, truncating any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_KEY_FORMAT) {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(stamp.date());
    }
    Err(SchedulerError::InvalidDate(raw.to_string()))
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Human readable form used in notifications, e.g. `Fri Oct 16 2026`
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_order_numerically_not_lexically() {
        let nine: Slot = "9:00".parse().unwrap();
        let ten: Slot = "10:00".parse().unwrap();
        assert!(nine < ten);
        assert!("9:00" > "10:00");
    }

    #[test]
    fn unpadded_and_padded_labels_are_the_same_slot() {
        let a: Slot = "9:00".parse().unwrap();
        let b: Slot = "09:00".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "09:00");
    }

    #[test]
    fn invalid_slot_reports_the_input() {
        let err = "25:00".parse::<Slot>().unwrap_err();
        assert_eq!(err, SchedulerError::InvalidSlot("25:00".to_string()));
    }

    #[test]
    fn slot_serializes_as_label() {
        let json = serde_json::to_string(&Slot::at(14, 30)).unwrap();
        assert_eq!(json, "\"14:30\"");
        let back: Slot = serde_json::from_str("\"14:30\"").unwrap();
        assert_eq!(back, Slot::at(14, 30));
    }

    #[test]
    fn date_keys_drop_the_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(parse_date_key("2026-10-16").unwrap(), expected);
        assert_eq!(parse_date_key("2026-10-16T18:45:00").unwrap(), expected);
        assert_eq!(parse_date_key("2026-10-16T23:59:59+02:00").unwrap(), expected);
        assert!(matches!(parse_date_key("16/10/2026"), Err(SchedulerError::InvalidDate(_))));
    }

    #[test]
    fn long_date_matches_calendar_style() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(format_long_date(date), "Fri Oct 16 2026");
        assert_eq!(format_date_key(date), "2026-10-16");
    }
}
