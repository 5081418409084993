//! Shared configuration, errors, and pagination types for Hoegye.
//!
//! This crate provides common types used across all other crates:
//! - Typed configuration (`AppConfig`, `LedgerConfig`)
//! - Transport-level error type for the HTTP layer
//! - Pagination types for list endpoints

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
pub use error::{AppError, AppResult};
