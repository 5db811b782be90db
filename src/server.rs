use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Config, handlers, handlers::AppState, signals::setup_signal_handlers, store};

/// Start the HTTP API
///
/// 1. Opens the configured reference data store
/// 2. Sets up signal handlers for graceful shutdown
/// 3. Binds to the configured address and serves until a shutdown signal
pub async fn start_server(config: Config) -> Result<()> {
    info!("Hybrid savings service starting...");

    let store = store::build_store(&config.data_source, &config.catalog)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open reference data store: {}", e))?;

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(AppState::new(store));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!(
        hybrid_brand = %config.catalog.hybrid_brand,
        "Listening on {}", addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/brands", get(handlers::catalog::list_brands))
        .route("/brands/:brand_id/models", get(handlers::catalog::list_models))
        .route(
            "/calculations",
            post(handlers::calculations::create_calculation),
        )
        .route(
            "/calculations/selection",
            post(handlers::calculations::select_hybrid),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
