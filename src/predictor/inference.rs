use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use candle_core::{Device, Tensor};
use candle_core::safetensors::MmapedSafetensors;

use crate::layers::activation::Activation;
use crate::layers::layer::Layer;
use crate::layers::scaler::StandardScalerLayer;
use crate::predictor::encoders::{self, LabelEncoders};
use crate::predictor::error::{ArtifactError, PredictError};
use crate::predictor::estimator::{DenseEstimator, Model};
use crate::predictor::features::{HealthInput, NUM_FEATURES};
use crate::predictor::format::{minutes_to_time, one_decimal};

pub const MODELS_FILE: &str = "models.safetensors";
pub const PREPROCESSOR_FILE: &str = "preprocessor.safetensors";
pub const ENCODERS_FILE: &str = "encoders.json";

/// The three artifacts, loaded once and shared read-only by every request.
pub struct Predictor {
    preprocessor: StandardScalerLayer,
    models: BTreeMap<String, DenseEstimator>,
    encoders: LabelEncoders,
    clock_targets: BTreeSet<String>,
    device: Device,
}

fn load_weights_mmap(path: &Path) -> Result<MmapedSafetensors, ArtifactError> {
    let weights = unsafe { MmapedSafetensors::new(path)? };
    Ok(weights)
}

fn require(path: &Path) -> Result<(), ArtifactError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ArtifactError::Missing(path.to_path_buf()))
    }
}

impl Predictor {
    pub fn load(
        dir: &Path,
        activation: Activation,
        clock_targets: impl IntoIterator<Item = String>,
        device: &Device,
    ) -> Result<Self, ArtifactError> {
        let models_path = dir.join(MODELS_FILE);
        let preprocessor_path = dir.join(PREPROCESSOR_FILE);
        let encoders_path = dir.join(ENCODERS_FILE);
        for path in [&models_path, &preprocessor_path, &encoders_path] {
            require(path)?;
        }

        let preprocessor =
            StandardScalerLayer::new(&load_weights_mmap(&preprocessor_path)?, device)?;
        if preprocessor.width() != NUM_FEATURES {
            return Err(ArtifactError::Invalid(format!(
                "preprocessor expects {} features, records have {NUM_FEATURES}",
                preprocessor.width()
            )));
        }

        let weights = load_weights_mmap(&models_path)?;
        let targets: BTreeSet<String> = weights
            .tensors()
            .into_iter()
            .filter_map(|(name, _)| name.strip_suffix(".0.weight").map(str::to_string))
            .collect();
        if targets.is_empty() {
            return Err(ArtifactError::Invalid(format!(
                "{} contains no models",
                models_path.display()
            )));
        }

        let mut models = BTreeMap::new();
        for target in targets {
            let model = DenseEstimator::load(&weights, &target, activation, device)?;
            if model.in_features() != preprocessor.width() {
                return Err(ArtifactError::Invalid(format!(
                    "model {target} expects {} features, preprocessor produces {}",
                    model.in_features(),
                    preprocessor.width()
                )));
            }
            tracing::info!("Loaded model {} ({} outputs)", target, model.out_features());
            models.insert(target, model);
        }

        let encoders = encoders::load_encoders(&encoders_path)?;
        tracing::info!("Loaded {} label encoders", encoders.len());

        Ok(Self::from_parts(preprocessor, models, encoders, clock_targets, device))
    }

    pub fn from_parts(
        preprocessor: StandardScalerLayer,
        models: BTreeMap<String, DenseEstimator>,
        encoders: LabelEncoders,
        clock_targets: impl IntoIterator<Item = String>,
        device: &Device,
    ) -> Self {
        Self {
            preprocessor,
            models,
            encoders,
            clock_targets: clock_targets.into_iter().collect(),
            device: device.clone(),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Validates the record, runs every model and formats each output.
    pub fn predict(&self, input: &HealthInput) -> Result<BTreeMap<String, String>, PredictError> {
        input.validate()?;

        let features =
            Tensor::from_vec(input.to_features().to_vec(), (1, NUM_FEATURES), &self.device)?;
        let processed = self.preprocessor.forward(&features)?;

        let mut predictions = BTreeMap::new();
        for (target, model) in &self.models {
            let raw = model.predict(&processed)?;
            tracing::debug!("{} raw prediction {}", target, raw);
            predictions.insert(target.clone(), self.format(target, raw)?);
        }
        Ok(predictions)
    }

    fn format(&self, target: &str, raw: f64) -> Result<String, PredictError> {
        if let Some(encoder) = self.encoders.get(target) {
            encoder
                .inverse_transform(raw)
                .map_err(|reason| PredictError::Decode {
                    target: target.to_string(),
                    reason,
                })
        } else if self.clock_targets.contains(target) {
            Ok(minutes_to_time(raw))
        } else {
            Ok(one_decimal(raw))
        }
    }
}
