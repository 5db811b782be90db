use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::comparison::CalculationError;
use crate::store::StoreError;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Malformed request payload
    BadRequest(String),
    /// Calculation or selection rejected
    Calculation(CalculationError),
    /// Reference data store failure outside a calculation
    Store(StoreError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Calculation(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "Data source error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Calculation(err) => match err {
                CalculationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                CalculationError::MissingReferenceData(_)
                | CalculationError::EmptyCandidateSet => StatusCode::UNPROCESSABLE_ENTITY,
                CalculationError::SelectionNotFound { .. } => StatusCode::CONFLICT,
                CalculationError::DataSource(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.to_string();

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type_name(&self),
            }
        }));

        (status, body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::BadRequest(_) => "bad_request",
        AppError::Calculation(err) => err.kind(),
        AppError::Store(_) => "data_source_error",
    }
}

impl From<CalculationError> for AppError {
    fn from(err: CalculationError) -> Self {
        Self::Calculation(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::MissingData;

    #[test]
    fn test_error_display() {
        let error = AppError::from(CalculationError::MissingReferenceData(MissingData::Efficiency));
        assert_eq!(error.to_string(), "no efficiency data for model");
    }

    #[test]
    fn test_error_type_name() {
        assert_eq!(
            error_type_name(&AppError::Calculation(CalculationError::EmptyCandidateSet)),
            "empty_candidate_set"
        );
        assert_eq!(error_type_name(&AppError::BadRequest("x".to_string())), "bad_request");
    }

    #[tokio::test]
    async fn test_error_response_status() {
        let response =
            AppError::Calculation(CalculationError::SelectionNotFound { hybrid_id: 3 }).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::Calculation(CalculationError::MissingReferenceData(
            MissingData::GasPrice,
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response =
            AppError::Calculation(CalculationError::InvalidInput("spend".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
