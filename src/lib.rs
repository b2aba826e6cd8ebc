//! Meeting scheduling: a per-date booking state machine with web and
//! terminal front ends.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod notify;
pub mod schedule;
pub mod store;
pub mod web;

pub use error::{Result, SchedulerError};
pub use notify::{LogNotifier, Notification, NotificationQueue, Notifier};
pub use schedule::{DailySchedule, Event, Granularity, Reservation, ReservationTable, Scheduler, Slot};
pub use store::{MemoryStore, ReservationStore};
