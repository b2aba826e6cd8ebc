use chrono::NaiveDate;
use thiserror::Error;

use crate::schedule::Slot;

/// Errors raised by the scheduler and its supporting types.
///
/// None of these are fatal: they describe a request the user has to correct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("cannot book {date}: the date is in the past (today is {today})")]
    PastDate { date: NaiveDate, today: NaiveDate },

    #[error("{slot} on {date} is already booked")]
    AlreadyBooked { date: NaiveDate, slot: Slot },

    #[error("{slot} on {date} has no reservation to cancel")]
    NotReserved { date: NaiveDate, slot: Slot },

    #[error("{slot} is not part of the daily schedule")]
    OutsideSchedule { slot: Slot },

    #[error("invalid time slot '{0}', expected HH:MM")]
    InvalidSlot(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid daily schedule: {0}")]
    InvalidSchedule(String),

    #[error("reservation store failure: {0}")]
    Store(String),
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
