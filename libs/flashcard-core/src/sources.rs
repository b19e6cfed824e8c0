//! Candidate source locations for deck files.
//!
//! The deployment environment (hosted under a site root, served from a
//! plain root, or run from a local checkout) is not known up front, so the
//! loader tries an ordered list of locations and keeps the first that works.

use crate::types::DeckDescriptor;
use serde::{Deserialize, Serialize};

/// Where the viewer is currently running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentContext {
    pub hostname: String,
    pub path: String,
    /// Served from a known hosted site root.
    pub is_hosted: bool,
}

impl DeploymentContext {
    /// A local checkout with deck files next to the viewer.
    pub fn local() -> Self {
        Self {
            hostname: "localhost".to_string(),
            path: "/".to_string(),
            is_hosted: false,
        }
    }

    /// Build a context from a hostname and path, classifying it against `site`.
    pub fn detect(hostname: impl Into<String>, path: impl Into<String>, site: &HostedSite) -> Self {
        let hostname = hostname.into();
        let is_hosted = site.matches_host(&hostname);
        Self {
            hostname,
            path: path.into(),
            is_hosted,
        }
    }
}

/// Known hosted deployment of the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedSite {
    /// Hostname suffix that identifies the hosted deployment.
    pub host_suffix: String,
    /// Absolute path of the site root on its host.
    pub root_path: String,
    /// Full public URL of the site root.
    pub public_url: String,
    /// Raw-content mirror of the repository serving the site.
    pub mirror_url: Option<String>,
}

impl Default for HostedSite {
    fn default() -> Self {
        Self {
            host_suffix: "github.io".to_string(),
            root_path: "/webapp_Flashcards/".to_string(),
            public_url: "https://philwilky.github.io/webapp_Flashcards/".to_string(),
            mirror_url: Some(
                "https://raw.githubusercontent.com/PhilWilky/webapp_Flashcards/main/".to_string(),
            ),
        }
    }
}

impl HostedSite {
    pub fn matches_host(&self, hostname: &str) -> bool {
        !self.host_suffix.is_empty() && hostname.contains(self.host_suffix.as_str())
    }
}

/// Ordered candidate locations for a deck, most specific first.
pub fn candidates(
    deck: &DeckDescriptor,
    context: &DeploymentContext,
    site: &HostedSite,
) -> Vec<String> {
    let source = deck.source.trim_start_matches('/');

    if context.is_hosted {
        let mut locations = vec![
            join(&site.root_path, source),
            join(&site.public_url, source),
        ];
        if let Some(mirror) = &site.mirror_url {
            locations.push(join(mirror, source));
        }
        locations
    } else {
        vec![source.to_string(), format!("../{}", source)]
    }
}

fn join(base: &str, source: &str) -> String {
    if base.is_empty() {
        return source.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), source)
}
