//! Advisory progress reports emitted while loading a deck.

use serde::Serialize;
use std::fmt;

/// Loader progress. Purely informational; never alters control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum LoadStatus {
    CacheHit { count: usize },
    CacheMiss { reason: CacheMissReason },
    Trying {
        attempt: u32,
        index: usize,
        total: usize,
        location: String,
    },
    CandidateFailed { location: String, reason: String },
    RetryScheduled { attempts_left: u32, backoff_ms: u64 },
    Loaded { location: String, count: usize },
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMissReason {
    Absent,
    Expired,
    /// The stored entry exists but cannot be decoded.
    Corrupted,
    Unreadable,
}

impl LoadStatus {
    /// Terminal statuses end a load.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::CacheHit { .. } | Self::Loaded { .. } | Self::Exhausted
        )
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CacheHit { count } => write!(f, "Using cached data ({} cards)", count),
            Self::CacheMiss { .. } => write!(f, "Fetching fresh data"),
            Self::Trying {
                attempt,
                index,
                location,
                ..
            } => write!(f, "Try {}.{}: {}", attempt, index, location),
            Self::CandidateFailed { location, reason } => {
                write!(f, "{} failed: {}", location, reason)
            }
            Self::RetryScheduled { attempts_left, .. } => write!(
                f,
                "All paths failed. Retrying ({} attempts left)",
                attempts_left
            ),
            Self::Loaded { count, .. } => write!(f, "Loaded {} cards", count),
            Self::Exhausted => write!(f, "All paths failed to access flashcards data"),
        }
    }
}
