//! Storage keys. Per-deck keys are a fixed prefix followed by the deck id.

pub const DATA_PREFIX: &str = "flashcardsData_";
pub const TIMESTAMP_PREFIX: &str = "flashcardsTimestamp_";
pub const VIEWED_PREFIX: &str = "flashcardsViewed_";
pub const LAST_SELECTED_DECK: &str = "lastSelectedDeck";
pub const SWIPE_TOOLTIP_SEEN: &str = "swipeTooltipSeen";

pub fn data(deck_id: &str) -> String {
    format!("{}{}", DATA_PREFIX, deck_id)
}

pub fn timestamp(deck_id: &str) -> String {
    format!("{}{}", TIMESTAMP_PREFIX, deck_id)
}

pub fn viewed(deck_id: &str) -> String {
    format!("{}{}", VIEWED_PREFIX, deck_id)
}
