//! Test fixtures and factory functions for deck data.

use serde_json::json;

/// Generate a deck JSON array with `num_cards` cards spread over `categories`.
///
/// Card `i` gets id `"card-i"` and category `cat{i % categories + 1}`.
pub fn sample_deck(num_cards: usize, categories: usize) -> String {
    let cards: Vec<_> = (0..num_cards)
        .map(|i| {
            json!({
                "id": format!("card-{}", i),
                "question": format!("Question {}?", i),
                "answer": format!("Answer {}.", i),
                "category": format!("cat{}", i % categories + 1),
            })
        })
        .collect();
    serde_json::to_string(&cards).unwrap()
}

/// A deck whose cards carry no ids.
pub fn deck_without_ids() -> String {
    json!([
        {
            "question": "What is IaaS?",
            "answer": "Infrastructure as a Service",
            "category": "Cloud Concepts"
        },
        {
            "question": "What is a region?",
            "answer": "A set of datacenters",
            "category": "Architecture"
        }
    ])
    .to_string()
}
