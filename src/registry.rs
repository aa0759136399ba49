//! Model registry
//!
//! Static mapping from model name to ONNX artifact, plus the ordered class
//! label set that model outputs are index-aligned with. Pure lookup, no
//! side effects; artifact existence is checked at load time, not here.

use std::path::PathBuf;

use crate::inference::PredictError;

/// Class labels, index-aligned with the model output vector
pub const CLASS_LABELS: [&str; 4] = ["EarlyPreB", "PreB", "ProB", "Benign"];

/// Registered models: name -> artifact file under the models directory
const MODEL_FILES: [(&str, &str); 4] = [
    ("EfficientB0", "EfficientB0.onnx"),
    ("EfficientNetB0", "EfficientNetB0.onnx"),
    ("MobileNetV2", "MobileNetV2.onnx"),
    ("NasNetMobile", "NasNetMobile.onnx"),
];

/// Resolves model names to artifact paths
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models_dir: PathBuf,
}

impl ModelRegistry {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// Registered model names, in registration order
    pub fn model_names(&self) -> Vec<&'static str> {
        MODEL_FILES.iter().map(|(name, _)| *name).collect()
    }

    /// Whether `name` is a registered model
    pub fn contains(&self, name: &str) -> bool {
        MODEL_FILES.iter().any(|(n, _)| *n == name)
    }

    /// Resolve a model name to its artifact path
    pub fn resolve(&self, name: &str) -> Result<PathBuf, PredictError> {
        MODEL_FILES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, file)| self.models_dir.join(file))
            .ok_or_else(|| PredictError::UnknownModel(name.to_string()))
    }
}
