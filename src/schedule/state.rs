use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{Result, SchedulerError};
use crate::notify::{Notification, Notifier};
use crate::store::ReservationStore;
use super::clock::{Clock, SystemClock};
use super::reservations::ReservationTable;
use super::slot_utils::DailySchedule;
use super::types::{Reservation, Slot};

/// User intents forwarded by a front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SelectDate(NaiveDate),
    BookSlot(Slot),
    CancelSlot(Slot),
}

/// Booking state for one session: the selected date, every reservation,
/// and the slots still open on the selected date.
pub struct Scheduler {
    schedule: DailySchedule,
    clock: Box<dyn Clock>,
    selected_date: NaiveDate,
    reservations: ReservationTable,
    available: Vec<Slot>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Scheduler {
    /// Starts on today's date with nothing booked
    pub fn new(schedule: DailySchedule) -> Self {
        Self::with_clock(schedule, Box::new(SystemClock))
    }

    pub fn with_clock(schedule: DailySchedule, clock: Box<dyn Clock>) -> Self {
        let selected_date = clock.today();
        let available = schedule.slots().to_vec();
        Self {
            schedule,
            clock,
            selected_date,
            reservations: ReservationTable::new(),
            available,
            notifiers: Vec::new(),
        }
    }

    /// Registers an observer that is told about every booking, cancellation
    /// and past-date rejection
    pub fn subscribe(&mut self, notifier: impl Notifier + 'static) {
        self.notifiers.push(Box::new(notifier));
    }

    pub fn apply(&mut self, event: Event) -> Result<()> {
        match event {
            Event::SelectDate(date) => {
                self.select_date(date);
                Ok(())
            }
            Event::BookSlot(slot) => self.book_slot(slot),
            Event::CancelSlot(slot) => self.cancel_slot(slot),
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.refresh_available();
        debug!(%date, available = self.available.len(), "date selected");
    }

    pub fn book_slot(&mut self, slot: Slot) -> Result<()> {
        let date = self.selected_date;
        let today = self.clock.today();
        if date < today {
            warn!(%date, %slot, "refusing to book a past date");
            self.emit(Notification::PastDateRejected { date });
            return Err(SchedulerError::PastDate { date, today });
        }
        if !self.schedule.contains(slot) {
            return Err(SchedulerError::OutsideSchedule { slot });
        }
        if !self.reservations.reserve(date, slot) {
            return Err(SchedulerError::AlreadyBooked { date, slot });
        }

        self.refresh_available();
        info!(%date, %slot, "slot booked");
        self.emit(Notification::Booked { date, slot });
        Ok(())
    }

    pub fn cancel_slot(&mut self, slot: Slot) -> Result<()> {
        let date = self.selected_date;
        if !self.reservations.release(date, slot) {
            return Err(SchedulerError::NotReserved { date, slot });
        }

        self.refresh_available();
        info!(%date, %slot, "reservation canceled");
        self.emit(Notification::Canceled { date, slot });
        Ok(())
    }

    /// Replaces the reservation table with the one held by `store`
    pub fn restore(&mut self, store: &dyn ReservationStore) -> Result<()> {
        self.reservations = store.load()?;
        self.refresh_available();
        info!(reservations = self.reservations.len(), "reservations restored");
        Ok(())
    }

    pub fn save_to(&self, store: &dyn ReservationStore) -> Result<()> {
        store.save(&self.reservations)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    /// Open slots on the selected date, ascending
    pub fn available_slots(&self) -> &[Slot] {
        &self.available
    }

    pub fn reserved_on(&self, date: NaiveDate) -> Vec<Slot> {
        self.reservations.reserved_on(date)
    }

    /// Every booking across all dates, ordered for display
    pub fn reservations(&self) -> Vec<Reservation> {
        self.reservations.reservations()
    }

    pub fn reservation_table(&self) -> &ReservationTable {
        &self.reservations
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    // Single place the available list is derived, so it always partitions
    // the schedule together with the selected date's reservations.
    fn refresh_available(&mut self) {
        self.available = self.reservations.available_on(&self.schedule, self.selected_date);
    }

    fn emit(&self, notification: Notification) {
        for notifier in &self.notifiers {
            notifier.notify(&notification);
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("selected_date", &self.selected_date)
            .field("available", &self.available)
            .field("reservations", &self.reservations)
            .field("notifiers", &self.notifiers.len())
            .finish()
    }
}
