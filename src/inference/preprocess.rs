//! Image preprocessing
//!
//! Decodes uploaded bytes, resizes to the 224x224 input resolution with
//! bilinear interpolation and scales pixels into [-1, 1], the input
//! distribution the MobileNetV2-family models were trained with. Output
//! layout is NHWC with a single-item batch dimension.

use image::imageops::FilterType;
use ndarray::Array4;

use super::PredictError;

/// Model input spatial resolution
pub const INPUT_HEIGHT: u32 = 224;
pub const INPUT_WIDTH: u32 = 224;

/// Decode raw image bytes into a `[1, 224, 224, 3]` input tensor.
pub fn prepare(bytes: &[u8]) -> Result<Array4<f32>, PredictError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| PredictError::ImageDecodeError(e.to_string()))?;

    let resized = img
        .resize_exact(INPUT_WIDTH, INPUT_HEIGHT, FilterType::Triangle)
        .to_rgb8();

    let mut tensor = Array4::<f32>::zeros((1, INPUT_HEIGHT as usize, INPUT_WIDTH as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            // x / 127.5 - 1, per the models' training preprocessing
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 127.5 - 1.0;
        }
    }

    Ok(tensor)
}
