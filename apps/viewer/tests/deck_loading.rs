//! Deck loader tests against real HTTP and filesystem sources.

mod common;

use std::sync::{Arc, Mutex};

use flashcard_core::{DeckDescriptor, DeploymentContext, HostedSite, LoaderSettings};
use flashcard_viewer::loader::{DeckLoader, LoadOrigin, LoadStatus, SourceFetcher};
use flashcard_viewer::storage::{CacheRepository, SqliteStore};
use mockito::Server;
use pretty_assertions::assert_eq;
use reqwest::Url;

use common::fixtures;
use common::TestContext;

fn deck() -> DeckDescriptor {
    DeckDescriptor::new("az-900", "Azure AZ-900 Fundamentals", "az-900.json")
}

/// A hosted site whose three candidates all live on the mock server.
fn mock_site(server_url: &str) -> HostedSite {
    HostedSite {
        host_suffix: "127.0.0.1".to_string(),
        root_path: "/site/".to_string(),
        public_url: format!("{}/public/", server_url),
        mirror_url: Some(format!("{}/mirror/", server_url)),
    }
}

fn recorder() -> (Arc<Mutex<Vec<LoadStatus>>>, impl Fn(&LoadStatus) + Send + Sync) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |status: &LoadStatus| {
        sink.lock().unwrap().push(status.clone())
    })
}

#[tokio::test]
async fn first_working_candidate_wins() {
    let mut server = Server::new_async().await;
    let root = server
        .mock("GET", "/site/az-900.json")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let public = server
        .mock("GET", "/public/az-900.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(fixtures::sample_deck(4, 2))
        .expect(1)
        .create_async()
        .await;
    let mirror = server
        .mock("GET", "/mirror/az-900.json")
        .with_status(200)
        .with_body(fixtures::sample_deck(1, 1))
        .expect(0)
        .create_async()
        .await;

    let base = Url::parse(&format!("{}/site/", server.url())).unwrap();
    let site = mock_site(&server.url());
    let context = DeploymentContext::detect(base.host_str().unwrap(), base.path(), &site);
    assert!(context.is_hosted);

    let loader = DeckLoader::new(
        SourceFetcher::new(Some(base), "."),
        LoaderSettings::default(),
        context,
        site,
    );
    let store = Mutex::new(SqliteStore::open_in_memory().unwrap());
    let (seen, on_status) = recorder();

    let report = loader.load(&deck(), &store, on_status).await;

    assert_eq!(report.cards.len(), 4);
    assert_eq!(
        report.origin,
        LoadOrigin::Network {
            location: format!("{}/public/az-900.json", server.url())
        }
    );
    root.assert_async().await;
    public.assert_async().await;
    mirror.assert_async().await;

    let cached = store.lock().unwrap().load_cache("az-900").unwrap().unwrap();
    assert_eq!(cached.payload, report.cards);

    let seen = seen.lock().unwrap();
    let failed: Vec<_> = seen
        .iter()
        .filter(|s| matches!(s, LoadStatus::CandidateFailed { .. }))
        .collect();
    assert_eq!(failed.len(), 1);
    assert!(matches!(seen.last(), Some(LoadStatus::Loaded { count: 4, .. })));
}

#[tokio::test]
async fn unparsable_body_moves_to_next_candidate() {
    let mut server = Server::new_async().await;
    let _root = server
        .mock("GET", "/site/az-900.json")
        .with_status(200)
        .with_body("<html>not a deck</html>")
        .create_async()
        .await;
    let _public = server
        .mock("GET", "/public/az-900.json")
        .with_status(500)
        .create_async()
        .await;
    let _mirror = server
        .mock("GET", "/mirror/az-900.json")
        .with_status(200)
        .with_body(fixtures::sample_deck(3, 3))
        .create_async()
        .await;

    let base = Url::parse(&format!("{}/site/", server.url())).unwrap();
    let site = mock_site(&server.url());
    let context = DeploymentContext::detect(base.host_str().unwrap(), base.path(), &site);
    let loader = DeckLoader::new(
        SourceFetcher::new(Some(base), "."),
        LoaderSettings::default(),
        context,
        site,
    );
    let store = Mutex::new(SqliteStore::open_in_memory().unwrap());

    let report = loader.load(&deck(), &store, |_: &LoadStatus| {}).await;
    assert_eq!(report.cards.len(), 3);
    assert!(!report.failed());
}

#[tokio::test]
async fn missing_files_exhaust_the_retry_budget() {
    let ctx = TestContext::new();
    let mut settings = ctx.config.loader.clone();
    settings.retries = 2;

    let loader = DeckLoader::new(
        SourceFetcher::new(None, ctx.config.deck_dir.clone()),
        settings,
        DeploymentContext::local(),
        HostedSite::default(),
    );
    let store = Mutex::new(SqliteStore::open_in_memory().unwrap());
    let (seen, on_status) = recorder();

    let report = loader.load(&deck(), &store, on_status).await;

    assert!(report.failed());
    assert!(report.cards.is_empty());
    assert_eq!(store.lock().unwrap().load_cache("az-900").unwrap(), None);

    let seen = seen.lock().unwrap();
    let tries = seen
        .iter()
        .filter(|s| matches!(s, LoadStatus::Trying { .. }))
        .count();
    let retries: Vec<u32> = seen
        .iter()
        .filter_map(|s| match s {
            LoadStatus::RetryScheduled { attempts_left, .. } => Some(*attempts_left),
            _ => None,
        })
        .collect();
    assert_eq!(tries, 6);
    assert_eq!(retries, vec![2, 1]);
    assert_eq!(seen.last(), Some(&LoadStatus::Exhausted));
}

#[tokio::test]
async fn local_fallback_reads_parent_directory() {
    let ctx = TestContext::new();
    std::fs::write(ctx.dir.path().join("az-900.json"), fixtures::sample_deck(2, 1)).unwrap();

    let loader = DeckLoader::new(
        SourceFetcher::new(None, ctx.config.deck_dir.clone()),
        ctx.config.loader.clone(),
        DeploymentContext::local(),
        HostedSite::default(),
    );
    let store = Mutex::new(SqliteStore::open_in_memory().unwrap());

    let report = loader.load(&deck(), &store, |_: &LoadStatus| {}).await;
    assert_eq!(report.cards.len(), 2);
    assert_eq!(
        report.origin,
        LoadOrigin::Network {
            location: "../az-900.json".to_string()
        }
    );
}
