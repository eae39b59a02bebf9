use crate::{
    backend::{AppointmentBackend, StoreError},
    types::{Appointment, BookedSlot, NewAppointment},
};
use chrono::Utc;
use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    /// Keyed by `(date, time)`, so a slot can only ever hold one appointment and iteration
    /// yields the listing order.
    appointments: BTreeMap<(String, String), Appointment>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalAppointments {
    inner: Arc<Mutex<Inner>>,
}

impl LocalAppointments {
    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("appointment store lock poisoned".into()))
    }

    #[cfg(test)]
    fn appointments(&self) -> Vec<Appointment> {
        self.lock().unwrap().appointments.values().cloned().collect()
    }
}

impl AppointmentBackend for LocalAppointments {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn booked_slots(&self, from: &str, to: &str) -> Result<Vec<BookedSlot>, StoreError> {
        let inner = self.lock()?;
        Ok(inner
            .appointments
            .values()
            .filter(|appointment| from <= appointment.date.as_str() && appointment.date.as_str() <= to)
            .map(BookedSlot::from)
            .collect())
    }

    fn add_appointment(&self, appointment: NewAppointment) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let id = inner.next_id + 1;

        match inner
            .appointments
            .entry((appointment.date.clone(), appointment.time.clone()))
        {
            Entry::Occupied(_) => return Err(StoreError::SlotTaken),
            Entry::Vacant(slot) => {
                slot.insert(Appointment {
                    id,
                    name: appointment.name,
                    email: appointment.email,
                    date: appointment.date,
                    time: appointment.time,
                    created_at: Utc::now(),
                });
            }
        }

        inner.next_id = id;
        Ok(())
    }
}
