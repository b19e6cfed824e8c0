//! Browsing session over a loaded deck.
//!
//! Holds every card of the active deck, the filtered view being browsed, the
//! position inside that view, the viewed-id set, and auto-play state. All
//! navigation on an empty view is a no-op.

use crate::autoplay::{AdvanceTicket, AutoPlay, PlayTick};
use crate::filter::{categories, CardFilter, CategoryFilter};
use crate::types::{Card, SessionStats};
use rand::Rng;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Session {
    all_cards: Vec<Card>,
    filtered: Vec<Card>,
    current_index: usize,
    filter: CardFilter,
    viewed: BTreeSet<String>,
    viewed_dirty: bool,
    answer_visible: bool,
    autoplay: AutoPlay,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything, including the viewed set. Used on deck change.
    pub fn reset(&mut self) {
        self.autoplay.stop();
        self.all_cards.clear();
        self.filtered.clear();
        self.current_index = 0;
        self.filter = CardFilter::default();
        self.viewed.clear();
        self.viewed_dirty = false;
        self.answer_visible = false;
    }

    /// Replace the viewed set with ids restored from storage.
    ///
    /// Ids of cards missing from the loaded deck are kept for persistence but
    /// never reported by `viewed_ids` or `stats`.
    pub fn restore_viewed<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.viewed = ids.into_iter().filter(|id| !id.is_empty()).collect();
        self.viewed_dirty = false;
    }

    /// Load a new card set, unfiltered, at the first card.
    pub fn set_cards(&mut self, cards: Vec<Card>) {
        self.autoplay.stop();
        self.filtered = cards.clone();
        self.all_cards = cards;
        self.filter = CardFilter::default();
        self.current_index = 0;
        self.answer_visible = false;
    }

    /// Rebuild the filtered view from all cards. `category` may be `"all"`.
    pub fn apply_filter(&mut self, category: &str, search: &str) {
        self.set_filter(CardFilter::new(CategoryFilter::parse(category), search));
    }

    pub fn set_filter(&mut self, filter: CardFilter) {
        self.autoplay.stop();
        self.filtered = filter.apply(&self.all_cards);
        self.filter = filter;
        self.current_index = 0;
        self.answer_visible = false;
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + 1) % len;
        self.answer_visible = false;
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + len - 1) % len;
        self.answer_visible = false;
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// Fisher-Yates over the filtered view, last to first.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let len = self.filtered.len();
        if len <= 1 {
            return;
        }
        for i in (1..len).rev() {
            let j = rng.gen_range(0..=i);
            self.filtered.swap(i, j);
        }
        self.current_index = 0;
        self.answer_visible = false;
    }

    /// Display the current card: marks its id as viewed.
    pub fn current_card(&mut self) -> Option<&Card> {
        let card = self.filtered.get(self.current_index)?;
        if let Some(id) = &card.id {
            if self.viewed.insert(id.clone()) {
                self.viewed_dirty = true;
            }
        }
        Some(card)
    }

    /// The current card without viewed tracking.
    pub fn peek_card(&self) -> Option<&Card> {
        self.filtered.get(self.current_index)
    }

    /// Viewed ids to persist, if the set changed since the last call.
    pub fn take_viewed_update(&mut self) -> Option<Vec<String>> {
        if !self.viewed_dirty {
            return None;
        }
        self.viewed_dirty = false;
        Some(self.viewed.iter().cloned().collect())
    }

    pub fn flip(&mut self) {
        if !self.filtered.is_empty() {
            self.answer_visible = !self.answer_visible;
        }
    }

    /// Flip playback on or off. Starting on an empty view is refused.
    ///
    /// Returns whether playback is active afterwards.
    pub fn toggle_play(&mut self) -> bool {
        if self.autoplay.is_playing() {
            self.autoplay.stop();
        } else if !self.filtered.is_empty() {
            self.autoplay.start();
        }
        self.autoplay.is_playing()
    }

    /// Returns whether playback was active.
    pub fn stop_play(&mut self) -> bool {
        self.autoplay.stop()
    }

    /// Interval tick of auto-play.
    pub fn on_tick(&mut self) -> PlayTick {
        let tick = self.autoplay.tick(self.answer_visible);
        match tick {
            PlayTick::Revealed => self.answer_visible = true,
            PlayTick::Advance(_) => self.answer_visible = false,
            PlayTick::Stopped => {}
        }
        tick
    }

    /// Delayed advance of auto-play. Stale tickets are ignored.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> bool {
        if !self.autoplay.redeem(ticket) {
            return false;
        }
        self.next();
        true
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay.is_playing()
    }

    pub fn answer_visible(&self) -> bool {
        self.answer_visible
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `(index, total)` of the filtered view.
    pub fn position(&self) -> (usize, usize) {
        (self.current_index, self.filtered.len())
    }

    pub fn all_cards(&self) -> &[Card] {
        &self.all_cards
    }

    pub fn filtered(&self) -> &[Card] {
        &self.filtered
    }

    pub fn filter(&self) -> &CardFilter {
        &self.filter
    }

    /// Viewed ids of cards in the loaded deck.
    pub fn viewed_ids(&self) -> BTreeSet<&str> {
        self.all_cards
            .iter()
            .filter_map(|card| card.id.as_deref())
            .filter(|id| self.viewed.contains(*id))
            .collect()
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.all_cards)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            total_cards: self.all_cards.len(),
            category_count: self.categories().len(),
            viewed_count: self.viewed_ids().len(),
        }
    }
}
