//! Per-request model loading
//!
//! Each request constructs a fresh session; there is no cross-request
//! cache, so concurrent requests never contend over a handle.

use ort::session::{builder::GraphOptimizationLevel, Session};

use super::PredictError;
use crate::registry::ModelRegistry;

/// Resolve `name` through the registry and bring up an inference session
/// bound to its artifact. The caller owns the session for exactly one
/// request.
pub fn load_model(registry: &ModelRegistry, name: &str) -> Result<Session, PredictError> {
    let model_path = registry.resolve(name)?;

    if !model_path.exists() {
        return Err(PredictError::ModelLoadFailure(format!(
            "model artifact not found: {}",
            model_path.display()
        )));
    }

    tracing::info!("Loading model '{}' from {}", name, model_path.display());

    let session = Session::builder()
        .map_err(|e| PredictError::ModelLoadFailure(format!("session builder: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| PredictError::ModelLoadFailure(format!("optimization level: {e}")))?
        .commit_from_file(&model_path)
        .map_err(|e| PredictError::ModelLoadFailure(format!("load: {e}")))?;

    Ok(session)
}
