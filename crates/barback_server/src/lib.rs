//! Barback server: JSON HTTP surface over the recipe catalog.
pub mod config;
mod error;
mod routes;

use std::sync::Arc;

use barback_engine::{RecipeCatalog, ReqwestFetcher};
use barback_logging::barback_info;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::{router, AppState};

/// Composes the catalog the server queries, backed by the real HTTP fetcher.
pub fn build_catalog(config: &ServerConfig) -> Arc<RecipeCatalog> {
    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch_settings()));
    Arc::new(RecipeCatalog::new(config.catalog_settings(), fetcher))
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState {
        catalog: build_catalog(&config),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    barback_info!("Barback listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    barback_info!("Barback stopped");
    Ok(())
}

async fn shutdown_signal() {
    // Without a Ctrl-C handler the server runs until the process is killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
