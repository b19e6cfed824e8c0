//! Application object composing the loader, session, store and auto-play timer.

use crate::config::ViewerConfig;
use crate::loader::{Clock, DeckLoader, LoadStatus, SourceFetcher};
use crate::lock;
use crate::player::{AutoPlayer, StepHook};
use crate::storage::{PreferencesRepository, SqliteStore, StoreError, ViewedRepository};
use flashcard_core::{Card, DeckDescriptor, Session, SessionStats};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("unknown deck: {0}")]
    UnknownDeck(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the viewer is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ViewerStatus {
    Idle,
    Loading {
        deck_name: String,
        detail: Option<String>,
    },
    Ready,
    /// The deck loaded but holds no cards.
    EmptyDeck,
    /// The deck has cards but none pass the filter.
    NoMatches,
    LoadFailed,
}

/// Render model handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub deck: DeckDescriptor,
    pub card: Option<Card>,
    pub answer_visible: bool,
    pub index: usize,
    pub total: usize,
    pub categories: Vec<String>,
    pub filter_category: String,
    pub search: String,
    pub stats: SessionStats,
    pub is_playing: bool,
    pub status: ViewerStatus,
}

impl ViewSnapshot {
    /// Capture the session. Reads the current card, so it counts as viewed.
    pub fn capture(deck: &DeckDescriptor, status: ViewerStatus, session: &mut Session) -> Self {
        let card = session.current_card().cloned();
        let (index, total) = session.position();
        Self {
            deck: deck.clone(),
            card,
            answer_visible: session.answer_visible(),
            index,
            total,
            categories: session.categories(),
            filter_category: session.filter().category.as_str().to_string(),
            search: session.filter().search().to_string(),
            stats: session.stats(),
            is_playing: session.is_playing(),
            status,
        }
    }
}

/// Horizontal swipe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Previous,
}

impl Swipe {
    /// Left past the threshold goes forward, right goes back.
    pub fn from_delta(delta_x: f64, threshold: f64) -> Option<Self> {
        if delta_x < -threshold {
            Some(Self::Next)
        } else if delta_x > threshold {
            Some(Self::Previous)
        } else {
            None
        }
    }
}

pub type StatusHook = Arc<dyn Fn(&LoadStatus) + Send + Sync>;
pub type RenderHook = Arc<dyn Fn(&ViewSnapshot) + Send + Sync>;

pub struct Viewer {
    config: ViewerConfig,
    store: Arc<Mutex<SqliteStore>>,
    loader: DeckLoader,
    session: Arc<Mutex<Session>>,
    player: AutoPlayer,
    deck: DeckDescriptor,
    status: Arc<Mutex<ViewerStatus>>,
    on_status: Option<StatusHook>,
    on_render: Option<RenderHook>,
}

impl Viewer {
    /// Open the store at the configured path and restore the last deck.
    pub fn open(config: ViewerConfig) -> Result<Self, ViewerError> {
        let store = SqliteStore::open(&config.db_path)?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: ViewerConfig, store: SqliteStore) -> Result<Self, ViewerError> {
        let deck = store
            .last_selected_deck()?
            .and_then(|id| config.deck(&id).cloned())
            .unwrap_or_else(|| config.default_deck().clone());

        let mut session = Session::new();
        session.restore_viewed(store.load_viewed(&deck.id)?);

        let loader = DeckLoader::new(
            SourceFetcher::new(config.base_url.clone(), config.deck_dir.clone()),
            config.loader.clone(),
            config.deployment_context(),
            config.site.clone(),
        );

        Ok(Self {
            config,
            store: Arc::new(Mutex::new(store)),
            loader,
            session: Arc::new(Mutex::new(session)),
            player: AutoPlayer::new(),
            deck,
            status: Arc::new(Mutex::new(ViewerStatus::Idle)),
            on_status: None,
            on_render: None,
        })
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.loader = self.loader.with_clock(clock);
        self
    }

    /// Receive loader progress.
    pub fn with_status_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&LoadStatus) + Send + Sync + 'static,
    {
        self.on_status = Some(Arc::new(hook));
        self
    }

    /// Receive a snapshot after every state change, auto-play steps included.
    pub fn with_render_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn(&ViewSnapshot) + Send + Sync + 'static,
    {
        self.on_render = Some(Arc::new(hook));
        self
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn decks(&self) -> &[DeckDescriptor] {
        &self.config.decks
    }

    pub fn current_deck(&self) -> &DeckDescriptor {
        &self.deck
    }

    pub fn status(&self) -> ViewerStatus {
        lock(&self.status).clone()
    }

    pub fn session(&self) -> MutexGuard<'_, Session> {
        lock(&self.session)
    }

    pub fn is_auto_playing(&self) -> bool {
        self.player.is_running() && lock(&self.session).is_playing()
    }

    /// Load the active deck into the session.
    pub async fn load(&mut self) -> ViewerStatus {
        self.stop_playback();
        self.set_status(ViewerStatus::Loading {
            deck_name: self.deck.name.clone(),
            detail: None,
        });

        let status_cell = self.status.clone();
        let on_status = self.on_status.clone();
        let deck_name = self.deck.name.clone();
        let report = self
            .loader
            .load(&self.deck, &*self.store, move |status: &LoadStatus| {
                if !status.is_terminal() {
                    *lock(&status_cell) = ViewerStatus::Loading {
                        deck_name: deck_name.clone(),
                        detail: Some(status.to_string()),
                    };
                }
                if let Some(hook) = &on_status {
                    hook(status);
                }
            })
            .await;

        let failed = report.failed();
        let status = {
            let mut session = lock(&self.session);
            session.set_cards(report.cards);
            if failed {
                ViewerStatus::LoadFailed
            } else if session.all_cards().is_empty() {
                ViewerStatus::EmptyDeck
            } else {
                ViewerStatus::Ready
            }
        };

        match &status {
            ViewerStatus::Ready => {
                tracing::info!(deck_id = %self.deck.id, origin = ?report.origin, "deck ready")
            }
            ViewerStatus::EmptyDeck => tracing::warn!(deck_id = %self.deck.id, "deck has no cards"),
            _ => tracing::error!(deck_id = %self.deck.id, "unable to load flashcards"),
        }

        self.set_status(status.clone());
        self.render();
        status
    }

    /// Switch decks. Unknown ids leave the viewer untouched.
    pub async fn select_deck(&mut self, deck_id: &str) -> Result<ViewerStatus, ViewerError> {
        let deck = self
            .config
            .deck(deck_id)
            .cloned()
            .ok_or_else(|| ViewerError::UnknownDeck(deck_id.to_string()))?;

        let viewed = {
            let store = lock(&self.store);
            let viewed = store.load_viewed(&deck.id)?;
            store.set_last_selected_deck(&deck.id)?;
            viewed
        };

        self.stop_playback();
        {
            let mut session = lock(&self.session);
            session.reset();
            session.restore_viewed(viewed);
        }

        tracing::info!(deck_id = %deck.id, name = %deck.name, "deck selected");
        self.deck = deck;
        Ok(self.load().await)
    }

    /// Re-run the load for the active deck.
    pub async fn reload(&mut self) -> ViewerStatus {
        tracing::info!(deck_id = %self.deck.id, "reloading deck");
        self.load().await
    }

    /// Filter by category (`"all"` for every category) and search text.
    pub fn apply_filter(&mut self, category: &str, search: &str) {
        self.player.stop();
        let matches = {
            let mut session = lock(&self.session);
            session.apply_filter(category, search);
            session.all_cards().is_empty() || !session.filtered().is_empty()
        };

        let mut status = lock(&self.status);
        match *status {
            ViewerStatus::Ready | ViewerStatus::NoMatches => {
                *status = if matches {
                    ViewerStatus::Ready
                } else {
                    ViewerStatus::NoMatches
                };
            }
            _ => {}
        }
        drop(status);
        self.render();
    }

    pub fn next(&mut self) {
        lock(&self.session).next();
        self.render();
    }

    pub fn previous(&mut self) {
        lock(&self.session).previous();
        self.render();
    }

    pub fn shuffle(&mut self) {
        lock(&self.session).shuffle();
        self.render();
    }

    pub fn flip(&mut self) {
        lock(&self.session).flip();
        self.render();
    }

    /// Start or stop auto-play. Returns whether it is playing afterwards.
    pub fn toggle_play(&mut self) -> bool {
        self.player.stop();
        let playing = lock(&self.session).toggle_play();
        if playing {
            self.player.start(
                self.session.clone(),
                &self.config.playback,
                Some(self.step_hook()),
            );
        }
        tracing::debug!(playing, "auto-play toggled");
        self.render();
        playing
    }

    /// Apply a horizontal swipe of `delta_x` pixels.
    pub fn swipe(&mut self, delta_x: f64) -> Option<Swipe> {
        let swipe = Swipe::from_delta(delta_x, f64::from(self.config.playback.swipe_threshold))?;
        match swipe {
            Swipe::Next => self.next(),
            Swipe::Previous => self.previous(),
        }
        Some(swipe)
    }

    /// Current render model. Counts as displaying the current card.
    pub fn snapshot(&self) -> ViewSnapshot {
        let mut session = lock(&self.session);
        capture(&self.deck, &self.status, &self.store, &mut session)
    }

    pub fn swipe_tooltip_seen(&self) -> bool {
        lock(&self.store).swipe_tooltip_seen().unwrap_or_else(|e| {
            tracing::warn!(%e, "failed to read tooltip flag");
            false
        })
    }

    pub fn mark_swipe_tooltip_seen(&self) -> Result<(), ViewerError> {
        lock(&self.store).mark_swipe_tooltip_seen()?;
        Ok(())
    }

    /// Cancel the timer task, then the session's playback.
    fn stop_playback(&mut self) {
        self.player.stop();
        lock(&self.session).stop_play();
    }

    fn set_status(&self, status: ViewerStatus) {
        *lock(&self.status) = status;
    }

    fn render(&self) {
        let snapshot = self.snapshot();
        if let Some(hook) = &self.on_render {
            hook(&snapshot);
        }
    }

    fn step_hook(&self) -> StepHook {
        let deck = self.deck.clone();
        let status = self.status.clone();
        let store = self.store.clone();
        let on_render = self.on_render.clone();
        Arc::new(move |session: &mut Session| {
            let snapshot = capture(&deck, &status, &store, session);
            if let Some(hook) = &on_render {
                hook(&snapshot);
            }
        })
    }
}

/// Snapshot the session and persist the viewed set if it changed.
fn capture(
    deck: &DeckDescriptor,
    status: &Mutex<ViewerStatus>,
    store: &Mutex<SqliteStore>,
    session: &mut Session,
) -> ViewSnapshot {
    let snapshot = ViewSnapshot::capture(deck, lock(status).clone(), session);
    if let Some(ids) = session.take_viewed_update() {
        if let Err(e) = lock(store).save_viewed(&deck.id, &ids) {
            tracing::warn!(deck_id = %deck.id, %e, "failed to save viewed cards");
        }
    }
    snapshot
}
