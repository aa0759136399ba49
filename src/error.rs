//! Error handling

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::inference::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request validation errors
    NoFilePart,
    NoImageFiles,
    InvalidModel,

    // Malformed multipart payloads
    BadRequest(String),

    // The selected model could not be brought up for this request
    ModelLoad(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NoFilePart => (StatusCode::BAD_REQUEST, "No file part."),
            AppError::NoImageFiles => (
                StatusCode::BAD_REQUEST,
                "At least one image file is required.",
            ),
            AppError::InvalidModel => (StatusCode::BAD_REQUEST, "Invalid model selected."),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ModelLoad(msg) => {
                tracing::error!("Model load error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load model.")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({ "error": error_message }));

        (status, body).into_response()
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::UnknownModel(_) => AppError::InvalidModel,
            PredictError::ModelLoadFailure(msg) => AppError::ModelLoad(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
