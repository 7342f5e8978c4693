//! Error types for ordhash-rs.
//!
//! The containers themselves never fail; absence is reported through
//! `Option`. These errors cover configuration and record loading.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error type
#[derive(Error, Debug)]
pub enum Error {
    /// A hash index cannot be built over zero buckets
    #[error("Invalid capacity: initial capacity must be at least 1")]
    InvalidCapacity,

    /// Load factor threshold must be finite and positive
    #[error("Invalid load factor: {0}")]
    InvalidLoadFactor(f64),

    /// I/O error while reading a record source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error (serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
