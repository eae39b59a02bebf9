use crate::schema::appointments::{self, dsl::*};
use crate::types::{BookedSlot, NewAppointment};
use crate::backend::{AppointmentBackend, StoreError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{Connection, ConnectionError, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};
use tracing::{debug, error};

const CREATE_APPOINTMENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS appointments (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (date, time)
)";

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::SlotTaken
            }
            err => StoreError::Backend(err.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
    schema_ready: Arc<AtomicBool>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = Self::establish_connection(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            schema_ready: Arc::new(AtomicBool::new(false)),
        })
    }

    fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
        PgConnection::establish(database_url)
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Backend("database connection lock poisoned".into()))
    }
}

impl AppointmentBackend for DatabaseInterface {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.schema_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        let mut connection = self.connection()?;
        if let Err(err) = diesel::sql_query(CREATE_APPOINTMENTS_TABLE).execute(&mut *connection) {
            error!(%err, "Failed to ensure appointments table");
            return Err(err.into());
        }

        debug!("Appointments table is present");
        self.schema_ready.store(true, Ordering::Release);
        Ok(())
    }

    fn booked_slots(&self, from: &str, to: &str) -> Result<Vec<BookedSlot>, StoreError> {
        let mut connection = self.connection()?;

        let result = appointments
            .filter(date.ge(from))
            .filter(date.le(to))
            .order((date.asc(), time.asc()))
            .select((date, time))
            .load::<BookedSlot>(&mut *connection);

        result.map_err(|err| {
            error!(%err, from, to, "Failed to read appointments from database");
            err.into()
        })
    }

    fn add_appointment(&self, appointment: NewAppointment) -> Result<(), StoreError> {
        let mut connection = self.connection()?;

        diesel::insert_into(appointments::table)
            .values(&appointment)
            .execute(&mut *connection)?;
        Ok(())
    }
}
