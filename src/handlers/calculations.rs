use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::comparison;
use crate::error::AppError;
use crate::handlers::AppState;
use crate::models::{CalculationResult, FormInput, SelectedHybrid};

/// Body of POST /api/calculations/selection
///
/// The service keeps no session, so the client sends back the comparison it
/// was shown together with the id it picked.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub result: CalculationResult,
    pub hybrid_id: i64,
}

/// POST /api/calculations
pub async fn create_calculation(
    State(state): State<AppState>,
    payload: Result<Json<FormInput>, JsonRejection>,
) -> Result<Json<CalculationResult>, AppError> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    info!(
        brand_id = input.brand_id,
        model_id = input.model_id,
        "Calculation requested"
    );
    let result = comparison::calculate(state.store.as_ref(), &input).await?;
    Ok(Json(result))
}

/// POST /api/calculations/selection
pub async fn select_hybrid(
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<Json<SelectedHybrid>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let selected = comparison::select(&request.result, request.hybrid_id)?;
    info!(
        hybrid_id = request.hybrid_id,
        annual_savings = selected.annual_savings,
        "Hybrid selected"
    );
    Ok(Json(selected))
}
