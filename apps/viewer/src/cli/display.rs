//! Plain-text rendering of viewer snapshots and loader progress.

use crate::loader::LoadStatus;
use crate::viewer::{ViewSnapshot, ViewerStatus};
use flashcard_core::DeckDescriptor;
use std::fmt::Write;

pub const SWIPE_TOOLTIP: &str =
    "Tip: swipe left or right to move between cards ('swipe <dx>'). Type 'gotit' to hide this.";

pub fn print_status(status: &LoadStatus) {
    println!("  .. {}", status);
}

pub fn print_snapshot(snapshot: &ViewSnapshot) {
    println!("{}", render(snapshot));
}

/// Render a snapshot as the card view text.
pub fn render(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();
    let stats = &snapshot.stats;

    let _ = writeln!(out, "== {} ==", snapshot.deck.name);
    let _ = writeln!(
        out,
        "Total cards: {} | Categories: {} | Viewed: {}",
        stats.total_cards, stats.category_count, stats.viewed_count
    );

    let mut filter = format!("Category: {}", snapshot.filter_category);
    if !snapshot.search.is_empty() {
        let _ = write!(filter, " | Search: {}", snapshot.search);
    }
    if snapshot.is_playing {
        filter.push_str(" | Auto-play");
    }
    let _ = writeln!(out, "{}", filter);

    match (&snapshot.status, &snapshot.card) {
        (ViewerStatus::Loading { deck_name, detail }, _) => {
            let _ = write!(out, "Loading {}...", deck_name);
            if let Some(detail) = detail {
                let _ = write!(out, " {}", detail);
            }
        }
        (ViewerStatus::LoadFailed, _) => {
            out.push_str("Unable to load flashcards. Check your connection and type 'reload'.");
        }
        (ViewerStatus::EmptyDeck, _) => out.push_str("This deck has no cards."),
        (ViewerStatus::NoMatches, _) | (_, None) => {
            out.push_str("No cards match the current filter.")
        }
        (_, Some(card)) => {
            let _ = writeln!(out, "[{}/{}] {}", snapshot.index + 1, snapshot.total, card.category);
            let _ = writeln!(out, "Q: {}", card.question);
            if snapshot.answer_visible {
                let _ = write!(out, "A: {}", card.answer);
            } else {
                out.push_str("A: (type 'f' to reveal)");
            }
        }
    }

    out
}

pub fn render_decks(decks: &[DeckDescriptor], current: &str) -> String {
    decks
        .iter()
        .map(|deck| {
            let marker = if deck.id == current { "*" } else { " " };
            format!("{} {} ({})", marker, deck.id, deck.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashcard_core::{Card, SessionStats};
    use pretty_assertions::assert_eq;

    fn snapshot() -> ViewSnapshot {
        ViewSnapshot {
            deck: DeckDescriptor::new("az-900", "AZ-900", "az-900.json"),
            card: Some(Card::new("What is IaaS?", "Infrastructure as a Service", "Cloud Concepts")),
            answer_visible: false,
            index: 1,
            total: 4,
            categories: vec!["Cloud Concepts".to_string()],
            filter_category: "all".to_string(),
            search: String::new(),
            stats: SessionStats {
                total_cards: 4,
                category_count: 1,
                viewed_count: 2,
            },
            is_playing: false,
            status: ViewerStatus::Ready,
        }
    }

    #[test]
    fn renders_card_with_hidden_answer() {
        assert_eq!(
            render(&snapshot()),
            "== AZ-900 ==\n\
             Total cards: 4 | Categories: 1 | Viewed: 2\n\
             Category: all\n\
             [2/4] Cloud Concepts\n\
             Q: What is IaaS?\n\
             A: (type 'f' to reveal)"
        );
    }

    #[test]
    fn renders_answer_and_filters() {
        let mut snapshot = snapshot();
        snapshot.answer_visible = true;
        snapshot.search = "iaas".to_string();
        snapshot.is_playing = true;
        let text = render(&snapshot);
        assert!(text.contains("Category: all | Search: iaas | Auto-play"));
        assert!(text.ends_with("A: Infrastructure as a Service"));
    }

    #[test]
    fn renders_status_messages() {
        let mut snapshot = snapshot();
        snapshot.card = None;
        snapshot.status = ViewerStatus::LoadFailed;
        assert!(render(&snapshot).ends_with("type 'reload'."));

        snapshot.status = ViewerStatus::EmptyDeck;
        assert!(render(&snapshot).ends_with("This deck has no cards."));

        snapshot.status = ViewerStatus::NoMatches;
        assert!(render(&snapshot).ends_with("No cards match the current filter."));
    }

    #[test]
    fn marks_current_deck() {
        let decks = vec![
            DeckDescriptor::new("az-900", "AZ-900", "az-900.json"),
            DeckDescriptor::new("ai-900", "AI-900", "ai-900.json"),
        ];
        assert_eq!(
            render_decks(&decks, "ai-900"),
            "  az-900 (AZ-900)\n* ai-900 (AI-900)"
        );
    }
}
