//! Crate-wide error type.
//!
//! The fit engine distinguishes four failure kinds so that callers can react
//! differently to each: structural input problems (`Validation`), missing
//! identities (`NotFound`), series too short to regress (`InsufficientData`)
//! and requests for fit methods that do not exist (`UnsupportedOperation`).
//! Persistence failures wrap the underlying `std::io` / `serde_json` errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GwrefError {
    /// Malformed or inconsistent input: duplicate well names, invalid time
    /// series, role mismatches, empty candidate sets, out-of-range
    /// confidence levels, persistence policy refusals.
    #[error("validation error: {0}")]
    Validation(String),

    /// An identity lookup failed: unknown well name, or an unknown
    /// fit-method tag in a persisted document.
    #[error("not found: {0}")]
    NotFound(String),

    /// Too few aligned samples to compute the requested statistic.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A fit method was requested by a name this crate does not implement.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GwrefError>;
