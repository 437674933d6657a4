/// Session model and database operations
///
/// A session row links a cookie token to an authenticated user. Only the
/// SHA-256 digest of the token is stored; see `auth::token`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash TEXT PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

use crate::models::user::Role;

/// Session model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the cookie token
    pub token_hash: String,

    /// The logged-in user
    pub user_id: i64,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    /// When the session stops being honored
    pub expires_at: DateTime<Utc>,
}

/// The user behind a live session, as resolved by [`Session::resolve`]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionUser {
    pub user_id: i64,
    pub name: String,
    pub role: Role,
}

impl Session {
    /// Creates a session for a user
    ///
    /// Called on successful login. `token_hash` is the digest of a freshly
    /// generated token; the plaintext goes into the Set-Cookie header only.
    pub async fn create<'a>(
        db: impl PgExecutor<'a>,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token_hash, user_id, created_at, expires_at
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;

        Ok(session)
    }

    /// Resolves a token digest to the logged-in user
    ///
    /// Expired sessions are treated as absent; they are reaped lazily by
    /// [`Session::purge_expired`] rather than here.
    pub async fn resolve<'a>(
        db: impl PgExecutor<'a>,
        token_hash: &str,
    ) -> Result<Option<SessionUser>, sqlx::Error> {
        let user = sqlx::query_as::<_, SessionUser>(
            r#"
            SELECT u.id AS user_id, u.name, u.role
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Tears down a session
    ///
    /// Returns true if a session row was actually removed, which is what
    /// gates the goodbye message on logout.
    pub async fn delete<'a>(
        db: impl PgExecutor<'a>,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes expired session rows
    ///
    /// Returns the number of rows reaped.
    pub async fn purge_expired<'a>(db: impl PgExecutor<'a>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(db)
            .await?;

        Ok(result.rows_affected())
    }
}
