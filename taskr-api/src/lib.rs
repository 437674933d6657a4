//! # Taskr API Server Library
//!
//! Core functionality for the Taskr to-do service.
//!
//! ## Modules
//!
//! - `app`: Application state, router, and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
