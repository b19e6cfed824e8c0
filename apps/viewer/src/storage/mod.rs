//! Local key/value store (SQLite) holding cached decks and preferences.

pub mod error;
pub mod keys;
pub mod repository;
pub mod schema;

pub use error::StoreError;
pub use repository::{CacheRepository, PreferencesRepository, SqliteStore, ViewedRepository};
