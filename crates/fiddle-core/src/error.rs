//! Error types for fiddle-core.

use std::time::Duration;

use thiserror::Error;

/// Result type for fiddle-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fiddle-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested fiddle could not be loaded.
    ///
    /// This is the only failure surfaced by resolution; the underlying
    /// lookup reason is logged but not carried.
    #[error("fiddle not found: {id} (version {version})")]
    FiddleNotFound { id: String, version: u32 },

    /// Library catalog could not be built.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Fiddle store could not be built.
    #[error("store error: {0}")]
    Store(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a persistence lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No record exists for the key.
    #[error("no such record")]
    Missing,

    /// The lookup did not answer in time.
    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),

    /// The backing store failed.
    #[error("backend failure: {0}")]
    Backend(String),
}
