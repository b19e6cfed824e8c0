//! Viewer configuration, read from the environment (and `.env`).

use flashcard_core::{
    DeckDescriptor, DeploymentContext, HostedSite, LoaderSettings, PlaybackSettings,
};
use reqwest::Url;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid URL in {key}: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("cannot read deck list {path}: {reason}")]
    DeckFile { path: PathBuf, reason: String },

    #[error("no decks configured")]
    NoDecks,

    #[error("default deck {0} is not in the deck list")]
    UnknownDefaultDeck(String),
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub db_path: PathBuf,
    pub decks: Vec<DeckDescriptor>,
    pub default_deck: String,
    /// Directory relative deck locations are read from when no base URL is set.
    pub deck_dir: PathBuf,
    /// Page URL the viewer is served from, if hosted.
    pub base_url: Option<Url>,
    pub site: HostedSite,
    pub loader: LoaderSettings,
    pub playback: PlaybackSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let decks = DeckDescriptor::defaults();
        let default_deck = decks[0].id.clone();
        Self {
            db_path: default_db_path(),
            decks,
            default_deck,
            deck_dir: PathBuf::from("."),
            base_url: None,
            site: HostedSite::default(),
            loader: LoaderSettings::default(),
            playback: PlaybackSettings::default(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flashcard-viewer")
        .join("viewer.db")
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("FLASHCARDS_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = get("FLASHCARDS_DECK_DIR") {
            config.deck_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("FLASHCARDS_DECKS_FILE") {
            config.decks = read_decks_file(PathBuf::from(path))?;
            config.default_deck = config.decks[0].id.clone();
        }
        if let Some(id) = get("FLASHCARDS_DEFAULT_DECK") {
            if !config.decks.iter().any(|d| d.id == id) {
                return Err(ConfigError::UnknownDefaultDeck(id));
            }
            config.default_deck = id;
        }

        if let Some(url) = get("FLASHCARDS_BASE_URL") {
            config.base_url = Some(parse_url("FLASHCARDS_BASE_URL", &url)?);
        }
        if let Some(suffix) = get("FLASHCARDS_HOSTED_SUFFIX") {
            config.site.host_suffix = suffix;
        }
        if let Some(root) = get("FLASHCARDS_SITE_ROOT") {
            config.site.root_path = root;
        }
        if let Some(url) = get("FLASHCARDS_PUBLIC_URL") {
            parse_url("FLASHCARDS_PUBLIC_URL", &url)?;
            config.site.public_url = url;
        }
        if let Some(url) = get("FLASHCARDS_MIRROR_URL") {
            config.site.mirror_url = match url.as_str() {
                "none" => None,
                _ => {
                    parse_url("FLASHCARDS_MIRROR_URL", &url)?;
                    Some(url)
                }
            };
        }

        let number = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            get(key).map(|v| parse_number(key, &v)).transpose()
        };
        if let Some(ms) = number("FLASHCARDS_CACHE_EXPIRY_MS")? {
            config.loader.cache_expiry_ms = ms;
        }
        if let Some(ms) = number("FLASHCARDS_FETCH_TIMEOUT_MS")? {
            config.loader.fetch_timeout_ms = ms;
        }
        if let Some(ms) = number("FLASHCARDS_RETRY_BACKOFF_MS")? {
            config.loader.retry_backoff_ms = ms;
        }
        if let Some(v) = get("FLASHCARDS_RETRIES") {
            config.loader.retries = parse_number("FLASHCARDS_RETRIES", &v)?;
        }
        if let Some(ms) = number("FLASHCARDS_AUTOPLAY_MS")? {
            if ms == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "FLASHCARDS_AUTOPLAY_MS",
                    value: "0".to_string(),
                });
            }
            config.playback.interval_ms = ms;
        }
        if let Some(ms) = number("FLASHCARDS_ADVANCE_DELAY_MS")? {
            config.playback.advance_delay_ms = ms;
        }
        if let Some(v) = get("FLASHCARDS_SWIPE_THRESHOLD") {
            config.playback.swipe_threshold = parse_number("FLASHCARDS_SWIPE_THRESHOLD", &v)?;
        }

        Ok(config)
    }

    /// Deployment context derived from the base URL, or a local context.
    pub fn deployment_context(&self) -> DeploymentContext {
        match &self.base_url {
            Some(url) => DeploymentContext::detect(
                url.host_str().unwrap_or_default(),
                url.path(),
                &self.site,
            ),
            None => DeploymentContext::local(),
        }
    }

    pub fn deck(&self, id: &str) -> Option<&DeckDescriptor> {
        self.decks.iter().find(|d| d.id == id)
    }

    pub fn default_deck(&self) -> &DeckDescriptor {
        self.deck(&self.default_deck).unwrap_or(&self.decks[0])
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
    })
}

fn read_decks_file(path: PathBuf) -> Result<Vec<DeckDescriptor>, ConfigError> {
    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::DeckFile {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let decks: Vec<DeckDescriptor> =
        serde_json::from_str(&content).map_err(|e| ConfigError::DeckFile {
            path,
            reason: e.to_string(),
        })?;
    if decks.is_empty() {
        return Err(ConfigError::NoDecks);
    }
    Ok(decks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = ViewerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.decks, DeckDescriptor::defaults());
        assert_eq!(config.default_deck().id, "azure-az900");
        assert_eq!(config.loader, LoaderSettings::default());
        assert_eq!(config.playback, PlaybackSettings::default());
        assert_eq!(config.deployment_context(), DeploymentContext::local());
    }

    #[test]
    fn hosted_base_url_builds_hosted_context() {
        let config = ViewerConfig::from_lookup(lookup(&[(
            "FLASHCARDS_BASE_URL",
            "https://philwilky.github.io/webapp_Flashcards/",
        )]))
        .unwrap();
        let context = config.deployment_context();
        assert!(context.is_hosted);
        assert_eq!(context.hostname, "philwilky.github.io");
        assert_eq!(context.path, "/webapp_Flashcards/");
    }

    #[test]
    fn other_host_is_not_hosted() {
        let config = ViewerConfig::from_lookup(lookup(&[(
            "FLASHCARDS_BASE_URL",
            "http://127.0.0.1:8080/",
        )]))
        .unwrap();
        assert!(!config.deployment_context().is_hosted);
    }

    #[test]
    fn numeric_overrides() {
        let config = ViewerConfig::from_lookup(lookup(&[
            ("FLASHCARDS_CACHE_EXPIRY_MS", "1000"),
            ("FLASHCARDS_RETRIES", "0"),
            ("FLASHCARDS_AUTOPLAY_MS", "500"),
            ("FLASHCARDS_SWIPE_THRESHOLD", "80"),
        ]))
        .unwrap();
        assert_eq!(config.loader.cache_expiry_ms, 1000);
        assert_eq!(config.loader.retries, 0);
        assert_eq!(config.playback.interval_ms, 500);
        assert_eq!(config.playback.swipe_threshold, 80);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_RETRIES", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "FLASHCARDS_RETRIES", .. }));

        let err =
            ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_AUTOPLAY_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_BASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_DEFAULT_DECK", "nope")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDefaultDeck(_)));
    }

    #[test]
    fn mirror_can_be_disabled() {
        let config =
            ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_MIRROR_URL", "none")])).unwrap();
        assert_eq!(config.site.mirror_url, None);
    }

    #[test]
    fn reads_deck_list_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("decks.json");
        std::fs::write(
            &path,
            r#"[
                {"id": "az-900", "name": "AZ-900", "source": "az-900.json"},
                {"id": "ai-900", "name": "AI-900", "source": "ai-900.json"}
            ]"#,
        )
        .unwrap();
        let path_str = path.to_string_lossy().to_string();

        let config = ViewerConfig::from_lookup(lookup(&[
            ("FLASHCARDS_DECKS_FILE", path_str.as_str()),
            ("FLASHCARDS_DEFAULT_DECK", "ai-900"),
        ]))
        .unwrap();
        assert_eq!(config.decks.len(), 2);
        assert_eq!(config.default_deck().source, "ai-900.json");
    }

    #[test]
    fn empty_deck_list_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("decks.json");
        std::fs::write(&path, "[]").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let err = ViewerConfig::from_lookup(lookup(&[("FLASHCARDS_DECKS_FILE", path_str.as_str())]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoDecks));
    }
}
