//! Category and free-text filtering of cards.

use crate::types::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category selector; `"all"` selects every category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category,
        }
    }

    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => card.category == *category,
        }
    }
}

/// Combined category + search predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    pub category: CategoryFilter,
    /// Lowercased, trimmed search text.
    search: String,
}

impl CardFilter {
    pub fn new(category: CategoryFilter, search: &str) -> Self {
        Self {
            category,
            search: search.trim().to_lowercase(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.search.is_empty()
    }

    pub fn matches(&self, card: &Card) -> bool {
        self.category.matches(card) && self.matches_search(card)
    }

    fn matches_search(&self, card: &Card) -> bool {
        self.search.is_empty()
            || card.question.to_lowercase().contains(&self.search)
            || card.answer.to_lowercase().contains(&self.search)
    }

    /// Cards passing the predicate, in their original order.
    pub fn apply(&self, cards: &[Card]) -> Vec<Card> {
        cards.iter().filter(|card| self.matches(card)).cloned().collect()
    }
}

/// Sorted unique categories.
pub fn categories(cards: &[Card]) -> Vec<String> {
    cards
        .iter()
        .map(|card| card.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
