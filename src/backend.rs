use crate::types::{BookedSlot, NewAppointment};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The `(date, time)` uniqueness constraint rejected the write.
    #[error("slot is already booked")]
    SlotTaken,

    #[error("store failure: {0}")]
    Backend(String),
}

pub trait AppointmentBackend: Clone + Send + Sync + 'static {
    /// Creates the appointments table if it does not exist yet. Safe to call on every request.
    fn ensure_schema(&self) -> Result<(), StoreError>;
    /// Slots booked with `from <= date <= to`, ordered by date and then time.
    fn booked_slots(&self, from: &str, to: &str) -> Result<Vec<BookedSlot>, StoreError>;
    fn add_appointment(&self, appointment: NewAppointment) -> Result<(), StoreError>;
}
