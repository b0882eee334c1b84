//! HTTP API server for the spending dashboard
//!
//! Routes are organized into modules:
//! - routes::export: full CSV export across every upstream page
//! - routes::spending: table feed and single-page CSV export
//! - routes::summary: per-account totals
//! - routes::upload: uploaded CSV summaries

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use spendboard_config::Config;
use spendboard_core::{CoreResult, HttpSpendingSource, SourceKind, SourceRef};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
///
/// Holds only read-only handles; per-user table state travels in each
/// request's query string.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Feed swept by the full export and the summary
    pub export_source: SourceRef,
    /// Feed behind the interactive table
    pub table_source: SourceRef,
}

impl AppState {
    pub fn new(config: Config, export_source: SourceRef, table_source: SourceRef) -> Self {
        Self {
            config: Arc::new(config),
            export_source,
            table_source,
        }
    }

    /// Build HTTP sources for both upstream feeds from the configuration
    pub fn from_config(config: Config) -> CoreResult<Self> {
        let timeout = Duration::from_secs(config.upstream.request_timeout_secs);
        let export_source =
            HttpSpendingSource::new(&config.upstream.export_url, SourceKind::Spending, timeout)?;
        let table_source =
            HttpSpendingSource::new(&config.upstream.table_url, SourceKind::Table, timeout)?;

        Ok(Self::new(config, Arc::new(export_source), Arc::new(table_source)))
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::export::api_export_csv;
    use routes::spending::{api_spending, api_spending_export};
    use routes::summary::api_summary;
    use routes::upload::api_upload_csv;

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/export-csv", get(api_export_csv))
        .route("/api/summary", get(api_summary))
        .route("/api/spending", get(api_spending))
        .route("/api/spending/export", get(api_spending_export))
        .route("/api/upload-csv", post(api_upload_csv))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    log::info!("Shutdown signal received");
}

/// Start the HTTP server and run until Ctrl-C
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = state.config.bind_addr();
    log::info!("Export feed: {}", state.export_source.name());
    log::info!("Table feed: {}", state.table_source.name());

    let router = create_router(state);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting spendboard server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - GET  /api/export-csv (full CSV export)");
    log::info!("  - GET  /api/spending (table page)");
    log::info!("  - GET  /api/spending/export (table page as CSV)");
    log::info!("  - GET  /api/summary (per-account totals)");
    log::info!("  - POST /api/upload-csv (uploaded CSV summary)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
