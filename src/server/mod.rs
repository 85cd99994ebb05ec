//! HTTP API and web console.
//!
//! Routes:
//! - `GET /` serves the console page
//! - `POST /` looks up the game source for `{"url": ...}`
//! - `GET /stats` reports request counters
//! - `GET /health` for liveness checks

mod assets;
mod error;
mod handlers;
mod routes;
mod stats;

pub use error::ApiError;
pub use routes::create_router;
pub use stats::{Stats, StatsCounter, StatsReport};

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::finder::{Finder, FinderOptions};
use crate::scrapers::{HttpClient, PageFetcher};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub finder: Arc<Finder>,
    pub stats: Arc<StatsCounter>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = HttpClient::from_settings(settings)?;
        Ok(Self::with_fetcher(
            Arc::new(client),
            settings.finder.clone(),
        ))
    }

    /// State backed by an arbitrary fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, options: FinderOptions) -> Self {
        Self {
            finder: Arc::new(Finder::new(fetcher, options)),
            stats: Arc::new(StatsCounter::new()),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
