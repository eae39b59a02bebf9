use crate::{error::ApiError, types::NewAppointment};
use chrono::{Datelike, NaiveDate, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

pub const TIME_SLOTS: [&str; 7] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00",
];

const REQUIRED: &str = "required";
const EMAIL: &str = "email";
const TIME_SLOT: &str = "time_slot";
const DATE_FORMAT: &str = "date_format";
const WEEKDAY: &str = "weekday";

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref DATE_PATTERN: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
}

/// Body of a booking request. Absent fields deserialize to empty strings and are then
/// rejected like empty ones.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AppointmentRequest {
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    #[validate(
        length(min = 1, code = "required"),
        regex(path = *EMAIL_PATTERN, code = "email")
    )]
    pub email: String,
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_weekday")
    )]
    pub date: String,
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_time_slot")
    )]
    pub time: String,
}

impl From<AppointmentRequest> for NewAppointment {
    fn from(request: AppointmentRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            date: request.date,
            time: request.time,
        }
    }
}

fn validate_time_slot(time: &str) -> Result<(), ValidationError> {
    if TIME_SLOTS.contains(&time) {
        Ok(())
    } else {
        Err(ValidationError::new(TIME_SLOT))
    }
}

/// Dates are stored and compared as text, so only the zero-padded form is accepted.
fn validate_weekday(date: &str) -> Result<(), ValidationError> {
    if !DATE_PATTERN.is_match(date) {
        return Err(ValidationError::new(DATE_FORMAT));
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ValidationError::new(DATE_FORMAT))?;
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => Err(ValidationError::new(WEEKDAY)),
        _ => Ok(()),
    }
}

/// Picks the one violation reported to the client. A request can break several rules at once,
/// only the first in pipeline order is surfaced.
fn first_violation(errors: &ValidationErrors) -> ApiError {
    let field_errors = errors.field_errors();
    let codes: Vec<&str> = field_errors
        .values()
        .flat_map(|errors| errors.iter())
        .map(|error| error.code.as_ref())
        .collect();

    [
        (REQUIRED, ApiError::MissingFields),
        (EMAIL, ApiError::InvalidEmail),
        (TIME_SLOT, ApiError::InvalidTimeSlot),
        (DATE_FORMAT, ApiError::InvalidDate),
        (WEEKDAY, ApiError::WeekendDate),
    ]
    .into_iter()
    .find(|(code, _)| codes.contains(code))
    .map(|(_, violation)| violation)
    .unwrap_or(ApiError::MissingFields)
}

/// Runs the create pipeline on a raw request body: JSON syntax, required fields, email, time
/// slot, then weekday.
pub fn validate_appointment(body: &[u8]) -> Result<NewAppointment, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;

    // Valid JSON of the wrong shape (non-object, non-string fields) counts as missing fields.
    let request: AppointmentRequest = serde_json::from_value(value).unwrap_or_default();

    request.validate().map_err(|errors| first_violation(&errors))?;
    Ok(request.into())
}
