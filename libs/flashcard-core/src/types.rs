//! Core types for the flashcard viewer.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// A question/answer pair loaded from a deck file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(
        default,
        deserialize_with = "deserialize_card_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
}

impl Card {
    /// Create a card without an id.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }

    /// Builder-style id assignment.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Other(IgnoredAny),
}

/// Accepts string or numeric ids; empty strings and other JSON types count as no id.
fn deserialize_card_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Text(text)) if text.is_empty() => None,
        Some(RawId::Text(text)) => Some(text),
        Some(RawId::Integer(n)) => Some(n.to_string()),
        Some(RawId::Unsigned(n)) => Some(n.to_string()),
        Some(RawId::Float(n)) => Some(n.to_string()),
        Some(RawId::Other(_)) | None => None,
    })
}

/// Parse a deck body (a JSON array of cards).
pub fn parse_cards(body: &str) -> serde_json::Result<Vec<Card>> {
    serde_json::from_str(body)
}

/// Static description of a deck that can be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckDescriptor {
    pub id: String,
    pub name: String,
    /// File name of the deck, resolved against each candidate base.
    pub source: String,
}

impl DeckDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: source.into(),
        }
    }

    /// Decks available when no deck list is configured.
    pub fn defaults() -> Vec<Self> {
        vec![Self::new(
            "azure-az900",
            "Azure AZ-900 Fundamentals",
            "az-900.json",
        )]
    }
}

/// Timing and retry settings for the deck loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderSettings {
    pub cache_expiry_ms: u64,
    pub fetch_timeout_ms: u64,
    pub retry_backoff_ms: u64,
    /// Extra passes over the candidate list after the first one fails.
    pub retries: u32,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            cache_expiry_ms: 24 * 60 * 60 * 1000,
            fetch_timeout_ms: 10_000,
            retry_backoff_ms: 2_000,
            retries: 3,
        }
    }
}

impl LoaderSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Auto-play and gesture settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSettings {
    pub interval_ms: u64,
    pub advance_delay_ms: u64,
    pub swipe_threshold: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            interval_ms: 3_000,
            advance_delay_ms: 400,
            swipe_threshold: 50,
        }
    }
}

impl PlaybackSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

/// Counters shown alongside the current card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_cards: usize,
    pub category_count: usize,
    pub viewed_count: usize,
}
