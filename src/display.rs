use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::schedule::{format_date_key, format_long_date, Reservation, Scheduler};

/// Light/dark presentation toggle. Has no effect on booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label of the button that switches away from this theme
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "Dark mode",
            Theme::Dark => "Light mode",
        }
    }
}

/// Formats a reservation as `YYYY-MM-DD HH:MM`
pub fn format_reservation(reservation: &Reservation) -> String {
    format!("{} {}", format_date_key(reservation.date), reservation.slot)
}

/// Writes the selected day's open slots in the format: HH:MM [OPEN]
pub fn write_available_slots<W: Write>(out: &mut W, scheduler: &Scheduler) -> std::io::Result<()> {
    let date = scheduler.selected_date();
    writeln!(out, "** Available on {} **", format_long_date(date))?;

    if scheduler.available_slots().is_empty() {
        writeln!(out, "  No slots available")?;
        return Ok(());
    }
    for slot in scheduler.available_slots() {
        writeln!(out, "  {} [OPEN]", slot)?;
    }
    Ok(())
}

/// Writes every outstanding booking regardless of the selected date
pub fn write_reservations<W: Write>(out: &mut W, scheduler: &Scheduler) -> std::io::Result<()> {
    let reservations = scheduler.reservations();
    writeln!(out, "** Reserved meetings ({}) **", reservations.len())?;
    for reservation in &reservations {
        writeln!(out, "  {}", format_reservation(reservation))?;
    }
    Ok(())
}
