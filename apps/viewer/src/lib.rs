pub mod cli;
pub mod config;
pub mod loader;
pub mod player;
pub mod storage;
pub mod viewer;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ViewerConfig;
use crate::viewer::Viewer;

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ViewerConfig::from_env()?;

    tracing::info!(db = %config.db_path.display(), "Opening local store...");
    let mut viewer = Viewer::open(config)?
        .with_status_hook(cli::display::print_status)
        .with_render_hook(cli::display::print_snapshot);

    tracing::info!(deck = %viewer.current_deck().id, "Loading deck...");
    viewer.load().await;

    cli::run_prompt(&mut viewer).await
}
