//! # Taskr Shared Library
//!
//! This crate contains the types and business logic shared between the
//! Taskr API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks, sessions)
//! - `auth`: Password hashing, session tokens, and the ownership policy
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the taskr shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
