//! # Error Handling Middleware
//!
//! Maps scheduling errors to HTTP status codes and `{"error": "..."}` bodies.
//! Repository failures are logged with their full report and answered with a
//! generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use trainerbook_core::errors::SchedulingError;

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub SchedulingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SchedulingError::MissingParameter(_)
            | SchedulingError::InvalidFormat(_)
            | SchedulingError::InvalidRequest(_)
            | SchedulingError::OutsideBusinessHours
            | SchedulingError::Misaligned
            | SchedulingError::InvalidDuration => StatusCode::BAD_REQUEST,
            SchedulingError::Conflict => StatusCode::CONFLICT,
            SchedulingError::Unauthorized => StatusCode::UNAUTHORIZED,
            SchedulingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self.0 {
            SchedulingError::Repository(report) => {
                tracing::error!(error = ?report, "Repository failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(SchedulingError::InvalidRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(SchedulingError::InvalidRequest(rejection.body_text()))
    }
}

/// Maps a SchedulingError to an HTTP response
pub fn map_error(err: SchedulingError) -> Response {
    AppError(err).into_response()
}
