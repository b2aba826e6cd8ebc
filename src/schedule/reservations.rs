use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::slot_utils::DailySchedule;
use super::types::{Reservation, Slot};

/// Booked slots per date.
///
/// A date is only present while at least one of its slots is booked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationTable {
    booked: BTreeMap<NaiveDate, BTreeSet<Slot>>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a booking. Returns false if the slot was already taken.
    pub fn reserve(&mut self, date: NaiveDate, slot: Slot) -> bool {
        self.booked.entry(date).or_default().insert(slot)
    }

    /// Drops a booking. Returns false if there was nothing to drop.
    pub fn release(&mut self, date: NaiveDate, slot: Slot) -> bool {
        let Some(slots) = self.booked.get_mut(&date) else {
            return false;
        };
        let removed = slots.remove(&slot);
        if slots.is_empty() {
            self.booked.remove(&date);
        }
        removed
    }

    pub fn is_reserved(&self, date: NaiveDate, slot: Slot) -> bool {
        self.booked.get(&date).is_some_and(|slots| slots.contains(&slot))
    }

    /// Booked slots for one date, ascending
    pub fn reserved_on(&self, date: NaiveDate) -> Vec<Slot> {
        self.booked
            .get(&date)
            .map(|slots| slots.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The schedule minus what is booked on `date`, ascending
    pub fn available_on(&self, schedule: &DailySchedule, date: NaiveDate) -> Vec<Slot> {
        match self.booked.get(&date) {
            Some(booked) => schedule
                .slots()
                .iter()
                .copied()
                .filter(|slot| !booked.contains(slot))
                .collect(),
            None => schedule.slots().to_vec(),
        }
    }

    /// Every booking, ordered by date then slot
    pub fn reservations(&self) -> Vec<Reservation> {
        self.booked
            .iter()
            .flat_map(|(date, slots)| slots.iter().map(move |slot| Reservation { date: *date, slot: *slot }))
            .collect()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.booked.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.booked.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.booked.is_empty()
    }
}

impl FromIterator<Reservation> for ReservationTable {
    fn from_iter<I: IntoIterator<Item = Reservation>>(iter: I) -> Self {
        let mut table = ReservationTable::new();
        for reservation in iter {
            table.reserve(reservation.date, reservation.slot);
        }
        table
    }
}
