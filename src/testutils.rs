use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::{
    backend::{AppointmentBackend, StoreError},
    types::{BookedSlot, NewAppointment},
};

pub struct MockAppointmentBackendInner {
    pub failure: Mutex<Option<StoreError>>,
    pub schema_failure: Mutex<Option<StoreError>>,
    pub calls_to_ensure_schema: AtomicU64,
    pub calls_to_booked_slots: AtomicU64,
    pub calls_to_add_appointment: AtomicU64,
    pub booked_slots: Mutex<Vec<BookedSlot>>,
    pub added_appointments: Mutex<Vec<NewAppointment>>,
    pub listing_gate: Mutex<Option<Receiver<()>>>,
}

#[derive(Clone)]
pub struct MockAppointmentBackend(pub Arc<MockAppointmentBackendInner>);

impl MockAppointmentBackendInner {
    fn new() -> Self {
        Self {
            failure: Mutex::default(),
            schema_failure: Mutex::default(),
            calls_to_ensure_schema: AtomicU64::default(),
            calls_to_booked_slots: AtomicU64::default(),
            calls_to_add_appointment: AtomicU64::default(),
            booked_slots: Mutex::default(),
            added_appointments: Mutex::default(),
            listing_gate: Mutex::default(),
        }
    }
}

impl MockAppointmentBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockAppointmentBackendInner::new()))
    }

    /// Makes every following read and write fail with `err`.
    pub fn fail_with(&self, err: StoreError) {
        *self.0.failure.lock().unwrap() = Some(err);
    }

    pub fn fail_schema_with(&self, err: StoreError) {
        *self.0.schema_failure.lock().unwrap() = Some(err);
    }

    pub fn set_booked_slots(&self, slots: Vec<BookedSlot>) {
        *self.0.booked_slots.lock().unwrap() = slots;
    }

    /// Blocks `booked_slots` until the returned sender fires (or five seconds pass).
    pub fn hold_listing(&self) -> Sender<()> {
        let (release, gate) = mpsc::channel();
        *self.0.listing_gate.lock().unwrap() = Some(gate);
        release
    }

    pub fn calls_to_ensure_schema(&self) -> u64 {
        self.0.calls_to_ensure_schema.load(Ordering::SeqCst)
    }

    pub fn calls_to_booked_slots(&self) -> u64 {
        self.0.calls_to_booked_slots.load(Ordering::SeqCst)
    }

    pub fn calls_to_add_appointment(&self) -> u64 {
        self.0.calls_to_add_appointment.load(Ordering::SeqCst)
    }

    fn result(failure: &Mutex<Option<StoreError>>) -> Result<(), StoreError> {
        match failure.lock().unwrap().clone() {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

impl AppointmentBackend for MockAppointmentBackend {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.0.calls_to_ensure_schema.fetch_add(1, Ordering::SeqCst);
        Self::result(&self.0.schema_failure)
    }

    fn booked_slots(&self, _from: &str, _to: &str) -> Result<Vec<BookedSlot>, StoreError> {
        self.0.calls_to_booked_slots.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.0.listing_gate.lock().unwrap().take() {
            let _ = gate.recv_timeout(Duration::from_secs(5));
        }
        Self::result(&self.0.failure)?;
        Ok(self.0.booked_slots.lock().unwrap().clone())
    }

    fn add_appointment(&self, appointment: NewAppointment) -> Result<(), StoreError> {
        self.0
            .calls_to_add_appointment
            .fetch_add(1, Ordering::SeqCst);
        Self::result(&self.0.failure)?;
        self.0.added_appointments.lock().unwrap().push(appointment);
        Ok(())
    }
}
