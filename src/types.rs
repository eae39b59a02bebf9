use crate::schema::appointments;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub struct Appointment {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// A validated booking, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
}

/// The public view of an appointment: which slot is taken, not by whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
pub struct BookedSlot {
    pub date: String,
    pub time: String,
}

impl From<&Appointment> for BookedSlot {
    fn from(appointment: &Appointment) -> Self {
        Self {
            date: appointment.date.clone(),
            time: appointment.time.clone(),
        }
    }
}
