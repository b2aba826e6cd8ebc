pub mod types;
pub mod slot_utils;
pub mod clock;
pub mod reservations;
pub mod state;

pub use types::{format_date_key, format_long_date, parse_date_key, Granularity, Reservation, Slot};
pub use slot_utils::DailySchedule;
pub use clock::{Clock, FixedClock, SystemClock};
pub use reservations::ReservationTable;
pub use state::{Event, Scheduler};
