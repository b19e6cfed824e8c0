//! Repository pattern over the local key/value table.

use crate::storage::error::StoreError;
use crate::storage::keys;
use chrono::Utc;
use flashcard_core::{parse_cards, CacheEntry, Card};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, StoreError>;

/// Cached deck payloads, keyed by deck id.
pub trait CacheRepository {
    /// Stored entry for a deck, `None` when absent.
    ///
    /// An unreadable payload or timestamp is `StoreError::Corrupted`.
    fn load_cache(&self, deck_id: &str) -> Result<Option<CacheEntry>>;
    fn save_cache(&self, deck_id: &str, cards: &[Card], stored_at_ms: i64) -> Result<()>;
}

/// Viewed card ids, keyed by deck id.
pub trait ViewedRepository {
    fn load_viewed(&self, deck_id: &str) -> Result<Vec<String>>;
    fn save_viewed(&self, deck_id: &str, ids: &[String]) -> Result<()>;
}

/// Global viewer preferences.
pub trait PreferencesRepository {
    fn last_selected_deck(&self) -> Result<Option<String>>;
    fn set_last_selected_deck(&self, deck_id: &str) -> Result<()>;
    fn swipe_tooltip_seen(&self) -> Result<bool>;
    fn mark_swipe_tooltip_seen(&self) -> Result<()>;
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at path, creating the file and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl CacheRepository for SqliteStore {
    fn load_cache(&self, deck_id: &str) -> Result<Option<CacheEntry>> {
        let data_key = keys::data(deck_id);
        let timestamp_key = keys::timestamp(deck_id);
        let (data, timestamp) = match (self.get(&data_key)?, self.get(&timestamp_key)?) {
            (None, None) => return Ok(None),
            (Some(data), Some(timestamp)) => (data, timestamp),
            (Some(_), None) => {
                return Err(StoreError::Corrupted {
                    key: timestamp_key,
                    reason: "missing".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(StoreError::Corrupted {
                    key: data_key,
                    reason: "missing".to_string(),
                })
            }
        };

        let stored_at_ms = timestamp
            .trim()
            .parse::<i64>()
            .map_err(|e| StoreError::Corrupted {
                key: timestamp_key,
                reason: e.to_string(),
            })?;
        let payload = parse_cards(&data).map_err(|e| StoreError::Corrupted {
            key: data_key,
            reason: e.to_string(),
        })?;

        Ok(Some(CacheEntry::new(payload, stored_at_ms)))
    }

    fn save_cache(&self, deck_id: &str, cards: &[Card], stored_at_ms: i64) -> Result<()> {
        let payload = serde_json::to_string(cards)?;
        let tx = self.conn.unchecked_transaction()?;
        self.set(&keys::data(deck_id), &payload)?;
        self.set(&keys::timestamp(deck_id), &stored_at_ms.to_string())?;
        tx.commit()?;
        Ok(())
    }
}

impl ViewedRepository for SqliteStore {
    fn load_viewed(&self, deck_id: &str) -> Result<Vec<String>> {
        let Some(raw) = self.get(&keys::viewed(deck_id))? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                tracing::warn!(deck_id, %e, "resetting unreadable viewed set");
                Ok(Vec::new())
            }
        }
    }

    fn save_viewed(&self, deck_id: &str, ids: &[String]) -> Result<()> {
        let raw = serde_json::to_string(ids)?;
        self.set(&keys::viewed(deck_id), &raw)
    }
}

impl PreferencesRepository for SqliteStore {
    fn last_selected_deck(&self) -> Result<Option<String>> {
        self.get(keys::LAST_SELECTED_DECK)
    }

    fn set_last_selected_deck(&self, deck_id: &str) -> Result<()> {
        self.set(keys::LAST_SELECTED_DECK, deck_id)
    }

    fn swipe_tooltip_seen(&self) -> Result<bool> {
        Ok(self.get(keys::SWIPE_TOOLTIP_SEEN)?.as_deref() == Some("true"))
    }

    fn mark_swipe_tooltip_seen(&self) -> Result<()> {
        self.set(keys::SWIPE_TOOLTIP_SEEN, "true")
    }
}
