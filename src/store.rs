use std::sync::Mutex;

use crate::error::{Result, SchedulerError};
use crate::schedule::ReservationTable;

/// Where a reservation table can be loaded from and saved to
pub trait ReservationStore {
    fn load(&self) -> Result<ReservationTable>;
    fn save(&self, table: &ReservationTable) -> Result<()>;
}

/// Keeps the last saved table in memory for the life of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<ReservationTable>,
}

impl MemoryStore {
    pub fn new(table: ReservationTable) -> Self {
        Self { table: Mutex::new(table) }
    }
}

impl ReservationStore for MemoryStore {
    fn load(&self) -> Result<ReservationTable> {
        self.table
            .lock()
            .map(|table| table.clone())
            .map_err(|_| SchedulerError::Store("memory store lock poisoned".to_string()))
    }

    fn save(&self, table: &ReservationTable) -> Result<()> {
        let mut stored = self
            .table
            .lock()
            .map_err(|_| SchedulerError::Store("memory store lock poisoned".to_string()))?;
        *stored = table.clone();
        Ok(())
    }
}
