use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::warn;

use crate::handlers::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "hybrid-savings",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Ready once the reference data store answers a gas price query
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.gas_price_per_liter().await {
        Ok(Some(_)) => (StatusCode::OK, Json(json!({
            "status": "ready",
            "service": "hybrid-savings",
        }))),
        Ok(None) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "not_ready",
            "reason": "no gas price configured",
        }))),
        Err(e) => {
            warn!("Readiness probe failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
                "status": "not_ready",
                "reason": "reference data store unreachable",
            })))
        }
    }
}
