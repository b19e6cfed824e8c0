//! Cache validity for locally stored decks.

use crate::types::Card;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// An entry is valid strictly before `expiry_ms` has elapsed since it was stored.
///
/// Timestamps from the future (clock skew) count as fresh.
pub fn is_cache_valid(now_ms: i64, stored_at_ms: i64, expiry_ms: u64) -> bool {
    let age = now_ms.saturating_sub(stored_at_ms);
    age < 0 || (age as u64) < expiry_ms
}

/// Cached deck payload for a single deck id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Vec<Card>,
    pub stored_at_ms: i64,
}

impl CacheEntry {
    pub fn new(payload: Vec<Card>, stored_at_ms: i64) -> Self {
        Self {
            payload,
            stored_at_ms,
        }
    }

    pub fn is_valid(&self, now_ms: i64, expiry_ms: u64) -> bool {
        is_cache_valid(now_ms, self.stored_at_ms, expiry_ms)
    }
}
