/// User model and database operations
///
/// A user is a registered account identified by a unique name and a unique
/// email. Identity fields are fixed at registration; only direct
/// administrative action removes an account.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'admin');
///
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Account role
///
/// `Admin` bypasses the ownership check for task mutation; everything else
/// behaves identically for both roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role assigned at registration
    User,

    /// May complete/delete any user's tasks
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User model representing a registered account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Sequential user ID
    pub id: i64,

    /// Login/display name, unique across all users
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// Account role (`user` by default)
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    pub role: Role,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the name or email is already taken (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create<'a>(
        db: impl PgExecutor<'a>,
        data: CreateUser,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id<'a>(
        db: impl PgExecutor<'a>,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by login name
    ///
    /// Login is a pure data lookup; the name is bound as a query parameter
    /// and never interpreted.
    pub async fn find_by_name<'a>(
        db: impl PgExecutor<'a>,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Checks whether a name or email is already registered
    ///
    /// Used by registration to reject duplicates before inserting; the
    /// unique constraints remain the final arbiter under concurrency.
    pub async fn name_or_email_taken<'a>(
        db: impl PgExecutor<'a>,
        name: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE name = $1 OR email = $2)
            "#,
        )
        .bind(name)
        .bind(email)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Deletes a user by ID
    ///
    /// Administrative action only; there is no route for this. Owned tasks
    /// and sessions go with the account via ON DELETE CASCADE.
    pub async fn delete<'a>(db: impl PgExecutor<'a>, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count<'a>(db: impl PgExecutor<'a>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_role_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            name: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: Role::User,
        };

        assert_eq!(create_user.name, "alice");
        assert_eq!(create_user.role, Role::User);
    }

    // Database operations are covered by the API integration tests.
}
