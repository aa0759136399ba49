//! Session invocation

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use super::PredictError;

/// Run one prepared image through the session and return the class
/// probability vector for the single batch row.
pub fn infer(session: &mut Session, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
    let output_name = session
        .outputs()
        .first()
        .map(|o| o.name().to_string())
        .ok_or_else(|| PredictError::InferenceError("model declares no output".to_string()))?;

    let input_tensor = Value::from_array(input)
        .map_err(|e| PredictError::InferenceError(format!("input tensor: {e}")))?;

    let outputs = session
        .run(ort::inputs![input_tensor])
        .map_err(|e| PredictError::InferenceError(e.to_string()))?;

    let output = outputs
        .get(&output_name)
        .ok_or_else(|| PredictError::InferenceError("no output produced".to_string()))?;

    let (_, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| PredictError::InferenceError(format!("output extract: {e}")))?;

    Ok(data.to_vec())
}
