use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use crate::predictor::features::HealthInput as PredictRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predictions: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
