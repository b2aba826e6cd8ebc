use crate::error::{Result, SchedulerError};
use super::types::{Granularity, Slot};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parses a time string (H:MM or HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u16> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 || parts[1].len() != 2 || parts[0].is_empty() || parts[0].len() > 2 {
        return None;
    }
    let hours: u16 = parts[0].parse().ok()?;
    let minutes: u16 = parts[1].parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Formats minutes since midnight to time string (HH:MM)
pub fn minutes_to_time_string(minutes: u16) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    format!("{:02}:{:02}", hours % 24, mins)
}

/// The fixed list of bookable slots for a business day.
///
/// Slot 1 = start time, every following slot = previous + granularity,
/// stopping before the end time. The list never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    slots: Vec<Slot>,
}

impl DailySchedule {
    pub fn new(start: Slot, end: Slot, granularity: Granularity) -> Result<Self> {
        if start >= end {
            return Err(SchedulerError::InvalidSchedule(format!(
                "day start {} must be before day end {}",
                start, end
            )));
        }

        let step = granularity.step_minutes();
        let mut slots = Vec::new();
        let mut current = start.minutes();
        while current < end.minutes() && current < MINUTES_PER_DAY {
            slots.push(Slot::from_minutes(current)?);
            current += step;
        }

        Ok(Self { slots })
    }

    /// Builds a schedule from the textual bounds used in configuration files.
    pub fn from_bounds(start: &str, end: &str, granularity: Granularity) -> Result<Self> {
        Self::new(start.parse()?, end.parse()?, granularity)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.binary_search(&slot).is_ok()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for DailySchedule {
    /// 09:00 to 17:00, one slot per hour (09:00 through 16:00).
    fn default() -> Self {
        let slots = (9..17).map(|hour| Slot::at(hour, 0)).collect();
        Self { slots }
    }
}
