use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::predictor::error::ArtifactError;

/// Index-to-class table of a fitted label encoder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct LabelEncoder {
    classes: Vec<Value>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<Value>) -> Self {
        Self { classes }
    }

    /// Maps a raw model output back to its class label. The output is
    /// truncated toward zero before indexing.
    pub fn inverse_transform(&self, raw: f64) -> Result<String, String> {
        if !raw.is_finite() {
            return Err(format!("cannot convert {raw} to a class index"));
        }
        let index = raw.trunc();
        if index < 0.0 || index >= self.classes.len() as f64 {
            return Err(format!(
                "y contains previously unseen labels: [{}]",
                index as i64
            ));
        }
        Ok(match &self.classes[index as usize] {
            Value::String(label) => label.clone(),
            other => other.to_string(),
        })
    }
}

pub type LabelEncoders = HashMap<String, LabelEncoder>;

pub fn load_encoders(path: &Path) -> Result<LabelEncoders, ArtifactError> {
    let file = std::fs::File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}
