/// Error handling for the API server
///
/// A unified error type that maps to HTTP responses. Handlers return
/// `ApiResult<T>` and the error converts into the right status code and
/// JSON body.
///
/// Message wording matters here: the testable surface of the service is
/// these strings (ownership refusals, the login notice, the not-found page),
/// so they live in one place.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskr_shared::auth::password::PasswordError;
use taskr_shared::auth::session::AuthError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Notice shown when a guarded route is hit without a session
pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to login first.";

/// Body of the not-found response
pub const NOT_FOUND_MESSAGE: &str = "Sorry. There's nothing here.";

/// Duplicate registration rejection
pub const DUPLICATE_USER_MESSAGE: &str = "That username and/or email already exist.";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - bad credentials
    Unauthorized(String),

    /// Unauthorized (401) - no session on a guarded route; carries a
    /// redirect hint to the login view
    LoginRequired,

    /// Forbidden (403) - ownership violation
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate name/email at registration
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "unauthorized", "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,

    /// Where the client should go instead (login view)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::LoginRequired => write!(f, "Unauthorized: {}", LOGIN_REQUIRED_MESSAGE),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details, redirect) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None, None),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg, None, None)
            }
            ApiError::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                LOGIN_REQUIRED_MESSAGE.to_string(),
                None,
                Some("/".to_string()),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
            redirect,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// A unique-constraint violation on the users table races with the
/// registration pre-check; map it to the same duplicate message.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("users_name") || constraint.contains("users_email") {
                        return ApiError::Conflict(DUPLICATE_USER_MESSAGE.to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
///
/// Covers the malformed-stored-credential case: a hash that does not parse
/// is an internal failure, never a crash.
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoSession => ApiError::LoginRequired,
            AuthError::DatabaseError(e) => {
                ApiError::InternalError(format!("Database error: {}", e))
            }
        }
    }
}

/// Maps `validator` failures to the validation error variant
pub fn validation_error(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::ValidationError(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Forbidden("You can only delete tasks that belong to you.".to_string());
        assert_eq!(
            err.to_string(),
            "Forbidden: You can only delete tasks that belong to you."
        );

        let err = ApiError::NotFound(NOT_FOUND_MESSAGE.to_string());
        assert_eq!(err.to_string(), "Not found: Sorry. There's nothing here.");
    }

    #[test]
    fn test_login_required_response() {
        let response = ApiError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "confirm".to_string(),
                message: "Passwords must match".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_auth_error_conversion() {
        let err: ApiError = AuthError::NoSession.into();
        assert!(matches!(err, ApiError::LoginRequired));
    }
}
