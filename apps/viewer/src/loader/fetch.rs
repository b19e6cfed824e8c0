//! Fetching raw deck bodies from candidate locations.

use flashcard_core::FetchError;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Retrieves the raw body stored at a candidate location.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Where a candidate location points after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

/// Fetches over HTTP(S) or from the local filesystem.
///
/// Relative locations are joined against `base_url` when one is set,
/// otherwise read from `deck_dir`.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
    base_url: Option<Url>,
    deck_dir: PathBuf,
}

impl SourceFetcher {
    pub fn new(base_url: Option<Url>, deck_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            deck_dir: deck_dir.into(),
        }
    }

    pub fn resolve(&self, location: &str) -> Result<Source, FetchError> {
        if let Ok(url) = Url::parse(location) {
            match url.scheme() {
                "http" | "https" => return Ok(Source::Http(url)),
                "file" => {
                    return url.to_file_path().map(Source::File).map_err(|_| {
                        FetchError::Network {
                            location: location.to_string(),
                            reason: "invalid file URL".to_string(),
                        }
                    })
                }
                _ => {}
            }
        }

        match &self.base_url {
            Some(base) => base
                .join(location)
                .map(Source::Http)
                .map_err(|e| FetchError::Network {
                    location: location.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(Source::File(self.deck_dir.join(location))),
        }
    }

    async fn fetch_http(&self, location: &str, url: Url) -> Result<String, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            location: location.to_string(),
            reason: e.to_string(),
        };

        let resp = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(network)?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: resp.status().as_u16(),
            });
        }

        resp.text().await.map_err(network)
    }

    async fn fetch_file(&self, location: &str, path: &Path) -> Result<String, FetchError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Network {
                location: location.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })
    }
}

impl Fetcher for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        match self.resolve(location)? {
            Source::Http(url) => self.fetch_http(location, url).await,
            Source::File(path) => self.fetch_file(location, &path).await,
        }
    }
}
