//! Shared setup for viewer integration tests.
//!
//! Every context owns a temporary directory holding the SQLite store and a
//! `decks/` directory that local deck sources are read from.

#![allow(dead_code)]

pub mod fixtures;

use std::path::PathBuf;

use flashcard_core::DeckDescriptor;
use flashcard_viewer::config::ViewerConfig;
use tempfile::TempDir;

pub struct TestContext {
    pub dir: TempDir,
    pub config: ViewerConfig,
}

impl TestContext {
    /// Local deployment with two decks, fast retries and no backoff to speak of.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("decks")).unwrap();

        let mut config = ViewerConfig::default();
        config.db_path = dir.path().join("viewer.db");
        config.deck_dir = dir.path().join("decks");
        config.decks = vec![
            DeckDescriptor::new("az-900", "Azure AZ-900 Fundamentals", "az-900.json"),
            DeckDescriptor::new("ai-900", "Azure AI-900 Fundamentals", "ai-900.json"),
        ];
        config.default_deck = "az-900".to_string();
        config.loader.retries = 1;
        config.loader.retry_backoff_ms = 10;
        config.loader.fetch_timeout_ms = 2_000;

        Self { dir, config }
    }

    pub fn deck_path(&self, file: &str) -> PathBuf {
        self.dir.path().join("decks").join(file)
    }

    pub fn write_deck(&self, file: &str, body: &str) {
        std::fs::write(self.deck_path(file), body).unwrap();
    }

    pub fn remove_deck(&self, file: &str) {
        std::fs::remove_file(self.deck_path(file)).unwrap();
    }
}
