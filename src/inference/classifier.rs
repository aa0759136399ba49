//! Bytes-in, label-out classification seam
//!
//! The request loop talks to this trait rather than to the session
//! directly, so the per-file orchestration can run against stub backends.

use ort::session::Session;

use super::loader::load_model;
use super::{labels, predict, preprocess, PredictError};
use crate::registry::ModelRegistry;

/// Classifies one image's raw bytes into a class label.
pub trait ImageClassifier {
    fn classify(&mut self, image_bytes: &[u8]) -> Result<String, PredictError>;
}

/// ONNX-backed classifier owning one per-request session
pub struct OnnxClassifier {
    session: Session,
}

impl OnnxClassifier {
    /// Resolve `name` through the registry and bring up a fresh session.
    pub fn load(registry: &ModelRegistry, name: &str) -> Result<Self, PredictError> {
        Ok(Self {
            session: load_model(registry, name)?,
        })
    }
}

impl ImageClassifier for OnnxClassifier {
    fn classify(&mut self, image_bytes: &[u8]) -> Result<String, PredictError> {
        let input = preprocess::prepare(image_bytes)?;
        let probabilities = predict::infer(&mut self.session, input)?;
        Ok(labels::interpret(&probabilities))
    }
}
