//! # Authentication Module
//!
//! Every appointment route is gated on a shared-secret bearer token. Requests
//! without `Authorization: Bearer <SERVICE_TOKEN>` are rejected with 401 before
//! any handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use trainerbook_core::errors::SchedulingError;

use crate::{ApiState, middleware::error_handling::AppError};

/// Extracts the token of a `Bearer` authorization header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Compares two tokens without short-circuiting on the first differing byte.
pub fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.len() == expected.len()
        && presented
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

pub async fn require_service_token(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = bearer_token(request.headers())
        .is_some_and(|token| tokens_match(token, &state.service_token));

    if !authorized {
        tracing::debug!(path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(AppError(SchedulingError::Unauthorized));
    }

    Ok(next.run(request).await)
}
