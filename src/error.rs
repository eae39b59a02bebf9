use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything the API reports to a client. The display text is the message sent in the body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Missing from/to parameters")]
    MissingRange,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing required fields: name, email, date, time")]
    MissingFields,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid time slot")]
    InvalidTimeSlot,

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Appointments are only available on weekdays")]
    WeekendDate,

    #[error("This time slot is already booked")]
    SlotTaken,

    #[error("Not found")]
    NotFound,

    /// Store failure. Carries a generic message, details stay in the logs.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingRange
            | ApiError::InvalidJson
            | ApiError::MissingFields
            | ApiError::InvalidEmail
            | ApiError::InvalidTimeSlot
            | ApiError::InvalidDate
            | ApiError::WeekendDate => StatusCode::BAD_REQUEST,
            ApiError::SlotTaken => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::WeekendDate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::SlotTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("Failed to create appointment").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        let err = ApiError::Internal("Failed to create appointment");
        assert_eq!(err.to_string(), "Failed to create appointment");
    }
}
