use crate::backend::{AppointmentBackend, StoreError};
use crate::configuration::Configuration;
use crate::error::ApiError;
use crate::types::BookedSlot;
use crate::validation::validate_appointment;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, Request};
use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, instrument, warn};

pub const API_ROOT: &str = "/api";

#[derive(Debug, Default, Deserialize)]
struct DateRange {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CreatedResponse {
    success: bool,
}

pub fn create_app<T: AppointmentBackend, C: Configuration>(backend: T, configuration: C) -> Router {
    let state = AppState { backend };

    let api = Router::new()
        .route(
            "/appointments",
            get(list_appointments::<T>)
                .post(create_appointment::<T>)
                .fallback(api_not_found),
        )
        .fallback(api_not_found)
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ));

    let app = Router::new().nest(API_ROOT, api).with_state(state);

    let app = match configuration.public_dir() {
        Some(public_dir) => {
            info!(public_dir = %public_dir.display(), "Serving static assets");
            app.fallback_service(ServeDir::new(public_dir).not_found_service(not_found.into_service()))
        }
        None => app.fallback(not_found),
    };

    app.layer(TraceLayer::new_for_http())
}

/// Answers CORS preflight for every API path without touching the store.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

/// Runs a store call on the blocking pool, the backends do synchronous I/O.
async fn run_blocking<T, R, F>(backend: &T, call: F) -> Result<R, StoreError>
where
    T: AppointmentBackend,
    R: Send + 'static,
    F: FnOnce(T) -> Result<R, StoreError> + Send + 'static,
{
    let backend = backend.clone();
    tokio::task::spawn_blocking(move || call(backend))
        .await
        .map_err(|err| StoreError::Backend(format!("store task failed: {err}")))?
}

async fn ensure_schema<T: AppointmentBackend>(backend: &T) -> Result<(), ApiError> {
    run_blocking(backend, |backend| backend.ensure_schema())
        .await
        .map_err(|err| {
            error!(%err, "Failed to ensure appointments table");
            ApiError::Internal("Failed to initialize storage")
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[instrument(skip(state))]
async fn list_appointments<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
    range: Result<Query<DateRange>, QueryRejection>,
) -> Result<Json<Vec<BookedSlot>>, ApiError> {
    ensure_schema(&state.backend).await?;

    let range = range.map(|Query(range)| range).unwrap_or_default();
    let (Some(from), Some(to)) = (non_empty(range.from), non_empty(range.to)) else {
        return Err(ApiError::MissingRange);
    };

    let (range_from, range_to) = (from.clone(), to.clone());
    let slots = run_blocking(&state.backend, move |backend| {
        backend.booked_slots(&range_from, &range_to)
    })
    .await
    .map_err(|err| {
        error!(%err, %from, %to, "Failed to fetch appointments");
        ApiError::Internal("Failed to fetch appointments")
    })?;

    debug!(count = slots.len(), %from, %to, "Listed booked slots");
    Ok(Json(slots))
}

#[instrument(skip(state, body))]
async fn create_appointment<T: AppointmentBackend>(
    State(state): State<AppState<T>>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    ensure_schema(&state.backend).await?;

    let appointment = validate_appointment(&body).map_err(|err| {
        debug!(%err, "Rejected appointment request");
        err
    })?;

    let (date, time) = (appointment.date.clone(), appointment.time.clone());
    let added = run_blocking(&state.backend, move |backend| {
        backend.add_appointment(appointment)
    })
    .await;
    match added {
        Ok(()) => {
            info!(%date, %time, "Appointment booked");
            Ok((StatusCode::CREATED, Json(CreatedResponse { success: true })))
        }
        Err(StoreError::SlotTaken) => {
            warn!(%date, %time, "Slot is already booked");
            Err(ApiError::SlotTaken)
        }
        Err(err) => {
            error!(%err, %date, %time, "Failed to create appointment");
            Err(ApiError::Internal("Failed to create appointment"))
        }
    }
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
