use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{Brand, Model};

/// GET /api/brands
pub async fn list_brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>, AppError> {
    Ok(Json(state.store.brands().await?))
}

/// GET /api/brands/:brand_id/models
pub async fn list_models(
    State(state): State<AppState>,
    Path(brand_id): Path<i64>,
) -> Result<Json<Vec<Model>>, AppError> {
    Ok(Json(state.store.models_by_brand(brand_id).await?))
}
