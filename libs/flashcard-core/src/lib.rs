//! Core flashcard library shared by the viewer application.
//!
//! Provides:
//! - Shared types (Card, DeckDescriptor, loader and playback settings)
//! - Cache validity rules for locally stored decks
//! - Candidate source resolution for deck files
//! - Category/search filtering
//! - Session state (navigation, shuffle, viewed tracking, auto-play)

pub mod autoplay;
pub mod cache;
pub mod error;
pub mod filter;
pub mod session;
pub mod sources;
pub mod types;

pub use autoplay::{AdvanceTicket, AutoPlay, PlayTick};
pub use cache::{is_cache_valid, now_millis, CacheEntry};
pub use error::{FetchError, Result};
pub use filter::{categories, CardFilter, CategoryFilter};
pub use session::Session;
pub use sources::{candidates, DeploymentContext, HostedSite};
pub use types::{parse_cards, Card, DeckDescriptor, LoaderSettings, PlaybackSettings, SessionStats};
