#![deny(missing_docs)]

//! Core library for the Student Roster service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Roster operation counters.
pub mod metrics;
/// Student records, storage, and operations.
pub mod roster;
