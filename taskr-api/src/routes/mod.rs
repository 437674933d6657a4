/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, logout
/// - `tasks`: Task listing, creation, completion, deletion

use axum::Json;
use axum::http::StatusCode;

use crate::error::{ErrorResponse, NOT_FOUND_MESSAGE};

pub mod auth;
pub mod health;
pub mod tasks;

/// Fallback handler for unknown routes
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not_found".to_string(),
            message: NOT_FOUND_MESSAGE.to_string(),
            details: None,
            redirect: None,
        }),
    )
}
