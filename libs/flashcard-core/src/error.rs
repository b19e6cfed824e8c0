//! Error types for flashcard-core.

use thiserror::Error;

/// Result type alias using FetchError.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Reasons a single candidate location failed to yield a deck.
///
/// None of these are terminal: the loader moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("{location} responded with status {status}")]
    Status { location: String, status: u16 },

    #[error("network error for {location}: {reason}")]
    Network { location: String, reason: String },

    #[error("{location} timed out after {after_ms}ms")]
    Timeout { location: String, after_ms: u64 },

    #[error("invalid deck JSON from {location}: {reason}")]
    Parse { location: String, reason: String },
}
