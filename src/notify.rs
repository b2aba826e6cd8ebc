use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::schedule::{format_long_date, Slot};

/// Messages emitted by the scheduler after a transition or a rejection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Booked { date: NaiveDate, slot: Slot },
    Canceled { date: NaiveDate, slot: Slot },
    PastDateRejected { date: NaiveDate },
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::Booked { date, slot } => {
                format!("Meeting booked for {} at {}", format_long_date(*date), slot)
            }
            Notification::Canceled { date, slot } => {
                format!("Meeting canceled for {} at {}", format_long_date(*date), slot)
            }
            Notification::PastDateRejected { date } => {
                format!("{} is in the past, pick another date", format_long_date(*date))
            }
        }
    }
}

/// Receives scheduler notifications. Delivery is fire-and-forget:
/// the scheduler never waits on or inspects the outcome.
pub trait Notifier: Send {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification) + Send,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// Writes every notification to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::PastDateRejected { date } => {
                warn!(%date, "{}", notification.message());
            }
            Notification::Booked { date, slot } | Notification::Canceled { date, slot } => {
                info!(%date, %slot, "{}", notification.message());
            }
        }
    }
}

/// Shared buffer of notifications waiting to be shown (toasts, test assertions)
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(notification.clone());
        }
    }
}
