use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::models::{HealthResponse, PredictRequest, PredictResponse};
use crate::app_state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        targets: state.predictor.targets().map(str::to_string).collect(),
    })
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(payload) = payload?;
    tracing::info!("Prediction request: {:?}", payload);

    let predictions = state.predictor.predict(&payload)?;

    tracing::info!("Predictions: {:?}", predictions);

    Ok(Json(PredictResponse { predictions }))
}
