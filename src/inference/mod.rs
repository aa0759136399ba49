//! ONNX inference pipeline
//!
//! Model loading, image preprocessing, session invocation and label
//! interpretation. Sessions are constructed per request and never shared.

mod classifier;
mod error;
pub mod labels;
mod loader;
mod predict;
pub mod preprocess;

pub use classifier::{ImageClassifier, OnnxClassifier};
pub use error::PredictError;
