//! # Appointment Handlers
//!
//! Thin adapters between HTTP and the availability engine. Each handler
//! extracts its input, delegates to the engine and lets [`AppError`] turn any
//! rejection into a status code.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use trainerbook_core::models::{
    appointment::{AppointmentResponse, CreateAppointmentRequest},
    availability::{AvailabilityQuery, AvailableSlot},
};

use crate::{ApiState, middleware::error_handling::AppError};

/// Lists the free slots of a trainer.
///
/// # Endpoint
///
/// ```text
/// GET /appointments?trainer_id=1&starts_at=2019-01-24T08:00:00-08:00&ends_at=2019-01-24T17:00:00-08:00
/// ```
///
/// All three parameters are required and both timestamps must carry an
/// offset. Slots come back in Pacific time.
#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<Vec<AvailableSlot>>, AppError> {
    let Query(query) = query?;
    let slots = state.engine.list_availability(&query).await?;
    Ok(Json(slots))
}

/// Books a slot.
///
/// # Endpoint
///
/// ```text
/// POST /appointments
/// {"trainer_id": 1, "user_id": 2, "starts_at": "...", "ends_at": "..."}
/// ```
///
/// Responds 201 with the stored appointment, 400 when the proposal is invalid
/// and 409 when the slot is already taken.
#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AppointmentResponse>), AppError> {
    let Json(payload) = payload?;
    let appointment = state.engine.create_booking(&payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Lists every appointment of a trainer.
#[axum::debug_handler]
pub async fn list_trainer_appointments(
    State(state): State<Arc<ApiState>>,
    Path(trainer_id): Path<String>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = state.engine.list_bookings(&trainer_id).await?;
    Ok(Json(appointments))
}
