/// Database models for Taskr
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Registered accounts with a `user`/`admin` role
/// - `task`: To-do entries, each owned by exactly one user
/// - `session`: Server-side login sessions backing the cookie

pub mod session;
pub mod task;
pub mod user;
