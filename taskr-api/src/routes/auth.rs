/// Authentication endpoints
///
/// Registration, login, and logout. Login establishes a server-side session
/// and hands the browser an HttpOnly cookie; logout tears the session down.
///
/// # Endpoints
///
/// - `GET /` - Login prompt
/// - `POST /` - Login (form fields `name`, `password`)
/// - `GET /register` - Registration prompt
/// - `POST /register` - Register (form fields `name`, `email`, `password`, `confirm`)
/// - `GET /logout` - Clear session (guarded)

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult, ValidationErrorDetail, DUPLICATE_USER_MESSAGE},
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Form, Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use taskr_shared::{
    auth::{
        password,
        session::{clear_session_cookie, session_cookie, Identity},
        token::generate_session_token,
    },
    models::{
        session::Session,
        user::{CreateUser, Role, User},
    },
};
use validator::Validate;

/// Generic rejection for unknown user or wrong password; never says which
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub name: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,

    /// The logged-in account
    pub user: UserView,
}

/// Public view of a user (no hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,

    /// Password confirmation; must equal `password`
    pub confirm: String,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,

    /// Where to go next (the login view)
    pub redirect: String,
}

/// Login prompt
///
/// The unauthenticated landing view.
pub async fn login_prompt() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Please login to access your task list.".to_string(),
    })
}

/// Login endpoint
///
/// Looks up the user by name and verifies the password. Unknown name and
/// wrong password produce the identical rejection. The lookup is pure data;
/// a markup-looking name is just a name that matches nothing.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown user or wrong password
/// - `500 Internal Server Error`: Malformed stored credential, database failure
pub async fn login(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = User::find_by_name(&state.db, &req.name)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            INVALID_CREDENTIALS_MESSAGE.to_string(),
        ));
    }

    // Establish the server-side session
    let ttl_seconds = state.session_ttl_seconds();
    let (token, token_hash) = generate_session_token();
    let expires_at = Utc::now() + Duration::seconds(ttl_seconds);

    Session::create(&state.db, &token_hash, user.id, expires_at).await?;

    tracing::info!(user_id = user.id, "User logged in");

    let cookie = session_cookie(&token, ttl_seconds);
    let body = Json(LoginResponse {
        message: "Welcome!".to_string(),
        user: UserView {
            id: user.id,
            name: user.name,
            role: user.role,
        },
    });

    Ok(([(header::SET_COOKIE, cookie)], body))
}

/// Registration prompt
pub async fn register_prompt() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Please register to access the task list.".to_string(),
    })
}

/// Register a new user
///
/// All fields are required; the password must match its confirmation; name
/// and email must be unused. On success exactly one row is inserted, with
/// role `user` and an Argon2id hash. Validation failures insert nothing.
///
/// # Errors
///
/// - `409 Conflict`: Name or email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Form(req): Form<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(validation_error)?;

    if req.password != req.confirm {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "confirm".to_string(),
            message: "Passwords must match".to_string(),
        }]));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate check and insert share one transaction; the unique
    // constraints cover the remaining race (mapped to the same 409).
    let mut tx = state.db.begin().await?;

    if User::name_or_email_taken(&mut *tx, &req.name, &req.email).await? {
        return Err(ApiError::Conflict(DUPLICATE_USER_MESSAGE.to_string()));
    }

    let user = User::create(
        &mut *tx,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: Role::User,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = user.id, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Thanks for registering. Please login.".to_string(),
            redirect: "/".to_string(),
        }),
    ))
}

/// Logout endpoint (guarded)
///
/// Deletes the session row behind the current identity and expires the
/// cookie. The goodbye only appears when a session was actually torn down;
/// without one the guard has already answered with the login notice.
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<impl IntoResponse> {
    let deleted = Session::delete(&state.db, &identity.session_key).await?;
    if !deleted {
        // Session disappeared between the guard and here
        return Err(ApiError::LoginRequired);
    }

    tracing::info!(user_id = identity.user_id, "User logged out");

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(MessageResponse {
            message: "Goodbye!".to_string(),
        }),
    ))
}
