use thiserror::Error;

/// Failures along the model -> tensor -> label pipeline
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model '{0}' is not registered")]
    UnknownModel(String),

    #[error("failed to load model: {0}")]
    ModelLoadFailure(String),

    #[error("failed to decode image: {0}")]
    ImageDecodeError(String),

    #[error("inference failed: {0}")]
    InferenceError(String),
}
