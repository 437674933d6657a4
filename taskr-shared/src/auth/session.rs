/// Session cookie plumbing and the request-scoped identity
///
/// The login handler issues a `taskr_session` cookie; the API's session
/// middleware calls [`authenticate`] on every guarded request and inserts
/// the resulting [`Identity`] into request extensions. Handlers read only
/// that identity, so authorization checks stay request-scoped and pure.
///
/// # Example
///
/// ```no_run
/// use taskr_shared::auth::session::{authenticate, Identity};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, cookie_header: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
/// let identity: Identity = authenticate(&pool, cookie_header).await?;
/// println!("logged in as {}", identity.name);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::token::hash_session_token;
use crate::models::session::Session;
use crate::models::user::Role;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "taskr_session";

/// The authenticated user associated with the current request
///
/// Built by the session middleware from the cookie; absent means
/// unauthenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// User id of the logged-in account
    pub user_id: i64,

    /// Login/display name
    pub name: String,

    /// Account role
    pub role: Role,

    /// Digest of the session token backing this identity; logout deletes
    /// the matching row
    pub session_key: String,
}

/// Error type for session authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No cookie, unknown token, or expired session
    #[error("No established session")]
    NoSession,

    /// Database error during session lookup
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Resolves the Cookie header to an [`Identity`]
///
/// # Errors
///
/// Returns `AuthError::NoSession` when there is no valid, unexpired session;
/// the caller maps this to the "login first" response.
pub async fn authenticate(
    pool: &PgPool,
    cookie_header: Option<&str>,
) -> Result<Identity, AuthError> {
    let token = cookie_header
        .and_then(token_from_cookie_header)
        .ok_or(AuthError::NoSession)?;

    let token_hash = hash_session_token(token);

    let session_user = Session::resolve(pool, &token_hash)
        .await?
        .ok_or(AuthError::NoSession)?;

    Ok(Identity {
        user_id: session_user.user_id,
        name: session_user.name,
        role: session_user.role,
        session_key: token_hash,
    })
}

/// Extracts the session token from a Cookie header value
///
/// Returns the raw token, or None if the cookie is absent.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}

/// Builds the Set-Cookie value that establishes a session
///
/// HttpOnly keeps the token away from scripts; SameSite=Lax keeps it off
/// cross-site requests.
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Builds the Set-Cookie value that clears the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_cookie_header() {
        assert_eq!(
            token_from_cookie_header("taskr_session=abc123"),
            Some("abc123")
        );

        // Amongst other cookies, with whitespace
        assert_eq!(
            token_from_cookie_header("theme=dark; taskr_session=abc123; lang=en"),
            Some("abc123")
        );

        // Absent or empty
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(token_from_cookie_header("taskr_session="), None);
        assert_eq!(token_from_cookie_header(""), None);

        // Name must match exactly
        assert_eq!(token_from_cookie_header("xtaskr_session=abc"), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123", 86400);

        assert!(cookie.starts_with("taskr_session=abc123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_clear_session_cookie() {
        let cookie = clear_session_cookie();

        assert!(cookie.starts_with("taskr_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_cookie_roundtrip() {
        let cookie = session_cookie("sometoken", 3600);
        let header_value = cookie.split(';').next().unwrap();

        assert_eq!(token_from_cookie_header(header_value), Some("sometoken"));
    }
}
