//! Output interpretation
//!
//! Arg-max over the probability vector, lowest index winning ties. A vector
//! that does not cover the label set degrades to a sentinel string rather
//! than an error; callers always receive a label field.

use crate::registry::CLASS_LABELS;

/// Returned when the output vector and the class label set do not line up
pub const OUT_OF_RANGE: &str = "Prediction index out of range.";

/// Map a probability vector to its class label.
pub fn interpret(probabilities: &[f32]) -> String {
    if probabilities.len() < CLASS_LABELS.len() {
        return OUT_OF_RANGE.to_string();
    }

    let mut best_idx = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &p) in probabilities.iter().enumerate() {
        if p > best_val {
            best_val = p;
            best_idx = idx;
        }
    }

    CLASS_LABELS
        .get(best_idx)
        .map(|label| label.to_string())
        .unwrap_or_else(|| OUT_OF_RANGE.to_string())
}
