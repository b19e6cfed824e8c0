//! Deck loader: cache-first, then ordered candidate probing with retries.

pub mod fetch;
pub mod status;

pub use fetch::{Fetcher, Source, SourceFetcher};
pub use status::{CacheMissReason, LoadStatus};

use crate::lock;
use crate::storage::{CacheRepository, StoreError};
use flashcard_core::{
    candidates, now_millis, parse_cards, Card, DeckDescriptor, DeploymentContext, FetchError,
    HostedSite, LoaderSettings,
};
use std::sync::{Arc, Mutex};

/// Source of "now" in epoch milliseconds.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Where the cards of a load came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Network { location: String },
    /// Every candidate failed on every pass.
    Exhausted,
}

/// Result of a load. `cards` is empty when the load was exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub cards: Vec<Card>,
    pub origin: LoadOrigin,
}

impl LoadReport {
    pub fn failed(&self) -> bool {
        self.origin == LoadOrigin::Exhausted
    }
}

pub struct DeckLoader<F = SourceFetcher> {
    fetcher: F,
    settings: LoaderSettings,
    context: DeploymentContext,
    site: HostedSite,
    clock: Clock,
}

impl<F: Fetcher> DeckLoader<F> {
    pub fn new(
        fetcher: F,
        settings: LoaderSettings,
        context: DeploymentContext,
        site: HostedSite,
    ) -> Self {
        Self {
            fetcher,
            settings,
            context,
            site,
            clock: Arc::new(now_millis),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Candidate locations for a deck in this deployment context.
    pub fn candidates(&self, deck: &DeckDescriptor) -> Vec<String> {
        candidates(deck, &self.context, &self.site)
    }

    /// Load a deck. Never fails: exhaustion yields an empty report.
    ///
    /// The cache lock is only held for synchronous reads and writes.
    pub async fn load<C, S>(
        &self,
        deck: &DeckDescriptor,
        cache: &Mutex<C>,
        on_status: S,
    ) -> LoadReport
    where
        C: CacheRepository,
        S: Fn(&LoadStatus) + Send + Sync,
    {
        let cached = lock(cache).load_cache(&deck.id);
        let miss = match cached {
            Ok(Some(entry)) if entry.is_valid((self.clock)(), self.settings.cache_expiry_ms) => {
                let cards = entry.payload.len();
                tracing::info!(deck_id = %deck.id, cards, "using cached deck");
                on_status(&LoadStatus::CacheHit { count: cards });
                return LoadReport {
                    cards: entry.payload,
                    origin: LoadOrigin::Cache,
                };
            }
            Ok(Some(_)) => CacheMissReason::Expired,
            Ok(None) => CacheMissReason::Absent,
            Err(e @ StoreError::Corrupted { .. }) => {
                tracing::warn!(deck_id = %deck.id, %e, "ignoring corrupted cache entry");
                CacheMissReason::Corrupted
            }
            Err(e) => {
                tracing::warn!(deck_id = %deck.id, %e, "cache read failed");
                CacheMissReason::Unreadable
            }
        };
        tracing::debug!(deck_id = %deck.id, ?miss, "cache miss");
        on_status(&LoadStatus::CacheMiss { reason: miss });

        let locations = self.candidates(deck);
        tracing::debug!(
            deck_id = %deck.id,
            ?locations,
            context = ?self.context,
            "trying candidates"
        );

        let Some((location, cards)) = self.fetch_first(&locations, &on_status).await else {
            tracing::error!(deck_id = %deck.id, "all candidate paths failed");
            on_status(&LoadStatus::Exhausted);
            return LoadReport {
                cards: Vec::new(),
                origin: LoadOrigin::Exhausted,
            };
        };

        if !cards.is_empty() {
            if let Err(e) = lock(cache).save_cache(&deck.id, &cards, (self.clock)()) {
                tracing::warn!(deck_id = %deck.id, %e, "failed to cache deck");
            }
        }

        tracing::info!(deck_id = %deck.id, %location, cards = cards.len(), "deck loaded");
        on_status(&LoadStatus::Loaded {
            location: location.clone(),
            count: cards.len(),
        });
        LoadReport {
            cards,
            origin: LoadOrigin::Network { location },
        }
    }

    /// Try candidates in order; on a fully failed pass, back off and retry.
    async fn fetch_first<S>(
        &self,
        locations: &[String],
        on_status: &S,
    ) -> Option<(String, Vec<Card>)>
    where
        S: Fn(&LoadStatus) + Send + Sync,
    {
        let passes = self.settings.retries.saturating_add(1);

        for pass in 0..passes {
            for (index, location) in locations.iter().enumerate() {
                on_status(&LoadStatus::Trying {
                    attempt: pass + 1,
                    index: index + 1,
                    total: locations.len(),
                    location: location.clone(),
                });

                match self.try_candidate(location).await {
                    Ok(cards) => return Some((location.clone(), cards)),
                    Err(e) => {
                        tracing::warn!(%location, error = %e, "candidate failed");
                        on_status(&LoadStatus::CandidateFailed {
                            location: location.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            let attempts_left = passes - pass - 1;
            if attempts_left > 0 {
                tracing::info!(attempts_left, "all paths failed, retrying");
                on_status(&LoadStatus::RetryScheduled {
                    attempts_left,
                    backoff_ms: self.settings.retry_backoff_ms,
                });
                tokio::time::sleep(self.settings.retry_backoff()).await;
            }
        }

        None
    }

    async fn try_candidate(&self, location: &str) -> Result<Vec<Card>, FetchError> {
        let body = tokio::time::timeout(self.settings.fetch_timeout(), self.fetcher.fetch(location))
            .await
            .map_err(|_| FetchError::Timeout {
                location: location.to_string(),
                after_ms: self.settings.fetch_timeout_ms,
            })??;

        parse_cards(&body).map_err(|e| FetchError::Parse {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}
