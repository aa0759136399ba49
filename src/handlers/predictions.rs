//! Prediction handler
//!
//! Validates the multipart request, loads the selected model once, then
//! runs save, classify and interpret for each uploaded file (the first six
//! non-empty entries; extras are silently ignored). A per-file failure
//! becomes an error entry in the results; the remaining files are still
//! processed.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::inference::{ImageClassifier, OnnxClassifier};
use crate::upload::TempUpload;
use crate::{AppError, AppResult, AppState};

/// Maximum number of images processed per request
const MAX_FILES: usize = 6;

/// Per-file outcome, keyed by the original filename
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileResult {
    Predicted {
        filename: String,
        predicted_class: String,
    },
    Failed {
        filename: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub results: Vec<FileResult>,
}

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<PredictionsResponse>> {
    let mut saw_files_field = false;
    let mut files: Vec<UploadedFile> = Vec::new();
    let mut model_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("files") => {
                saw_files_field = true;
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await?.to_vec();
                files.push(UploadedFile { filename, bytes });
            }
            Some("model") => {
                model_name = Some(field.text().await?);
            }
            _ => {}
        }
    }

    if !saw_files_field {
        return Err(AppError::NoFilePart);
    }
    if files.iter().all(|f| f.filename.is_empty()) {
        return Err(AppError::NoImageFiles);
    }

    let model_name = model_name.unwrap_or_default();
    if !state.registry.contains(&model_name) {
        return Err(AppError::InvalidModel);
    }

    // One session per request; every file in this request reuses it.
    let mut classifier = OnnxClassifier::load(&state.registry, &model_name)?;

    let request_token = Uuid::new_v4().to_string();
    let results = process_files(
        &state.config.upload_dir,
        &request_token,
        &files,
        &mut classifier,
    );

    Ok(Json(PredictionsResponse { results }))
}

/// Run the per-file pipeline over the first `MAX_FILES` non-empty uploads.
/// Entries with an empty filename are skipped and do not count toward the
/// cap; a failed file becomes an error entry and the loop continues.
fn process_files<C: ImageClassifier>(
    upload_dir: &Path,
    request_token: &str,
    files: &[UploadedFile],
    classifier: &mut C,
) -> Vec<FileResult> {
    let mut results = Vec::new();

    for file in files
        .iter()
        .filter(|f| !f.filename.is_empty())
        .take(MAX_FILES)
    {
        match classify_one(upload_dir, request_token, file, classifier) {
            Ok(predicted_class) => results.push(FileResult::Predicted {
                filename: file.filename.clone(),
                predicted_class,
            }),
            Err(e) => {
                tracing::warn!("Prediction failed for '{}': {}", file.filename, e);
                results.push(FileResult::Failed {
                    filename: file.filename.clone(),
                    error: "Prediction failed.".to_string(),
                });
            }
        }
    }

    results
}

/// Save and classify a single upload. The temp copy is removed when the
/// guard drops, whether or not prediction succeeded.
fn classify_one<C: ImageClassifier>(
    upload_dir: &Path,
    request_token: &str,
    file: &UploadedFile,
    classifier: &mut C,
) -> anyhow::Result<String> {
    let saved = TempUpload::save(upload_dir, request_token, &file.filename, &file.bytes)?;
    tracing::debug!("Saved upload to {}", saved.path().display());

    Ok(classifier.classify(&file.bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::inference::PredictError;
    use crate::{config::Config, registry::ModelRegistry, AppState};

    fn test_state() -> AppState {
        let config = Config {
            port: 0,
            models_dir: std::env::temp_dir().join("leukoscan-test-no-models"),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: 1024 * 1024,
        };
        let registry = ModelRegistry::new(config.models_dir.clone());
        AppState { config, registry }
    }

    /// Labels everything "Benign", except the broken marker payload which
    /// fails the way a truncated image would.
    struct StubClassifier {
        calls: usize,
    }

    impl ImageClassifier for StubClassifier {
        fn classify(&mut self, image_bytes: &[u8]) -> Result<String, PredictError> {
            self.calls += 1;
            if image_bytes == b"broken" {
                return Err(PredictError::ImageDecodeError("truncated".to_string()));
            }
            Ok("Benign".to_string())
        }
    }

    fn upload(name: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    fn result_filenames(results: &[FileResult]) -> Vec<String> {
        results
            .iter()
            .map(|r| match r {
                FileResult::Predicted { filename, .. } | FileResult::Failed { filename, .. } => {
                    filename.clone()
                }
            })
            .collect()
    }

    #[test]
    fn test_one_result_per_file_in_upload_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            upload("a.png", b"x"),
            upload("b.png", b"x"),
            upload("c.png", b"x"),
        ];
        let mut classifier = StubClassifier { calls: 0 };

        let results = process_files(dir.path(), "req", &files, &mut classifier);

        assert_eq!(result_filenames(&results), vec!["a.png", "b.png", "c.png"]);
        assert!(results.iter().all(|r| matches!(
            r,
            FileResult::Predicted { predicted_class, .. } if predicted_class == "Benign"
        )));
    }

    #[test]
    fn test_cap_at_six_skips_empty_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = vec![upload("", b"x")];
        for i in 1..=8 {
            files.push(upload(&format!("img{i}.png"), b"x"));
        }
        let mut classifier = StubClassifier { calls: 0 };

        let results = process_files(dir.path(), "req", &files, &mut classifier);

        // The empty entry does not count toward the cap; entries past the
        // sixth non-empty one produce no result.
        assert_eq!(
            result_filenames(&results),
            vec![
                "img1.png", "img2.png", "img3.png", "img4.png", "img5.png", "img6.png"
            ]
        );
        assert_eq!(classifier.calls, 6);
    }

    #[test]
    fn test_failed_file_records_error_entry_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            upload("good1.png", b"x"),
            upload("bad.png", b"broken"),
            upload("good2.png", b"x"),
        ];
        let mut classifier = StubClassifier { calls: 0 };

        let results = process_files(dir.path(), "req", &files, &mut classifier);

        assert_eq!(results.len(), 3);
        assert!(matches!(
            &results[1],
            FileResult::Failed { filename, error }
                if filename == "bad.png" && error == "Prediction failed."
        ));
        assert!(matches!(&results[0], FileResult::Predicted { .. }));
        assert!(matches!(&results[2], FileResult::Predicted { .. }));
    }

    #[test]
    fn test_temp_files_removed_after_processing() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            upload("keep-none-1.png", b"x"),
            upload("bad.png", b"broken"),
            upload("keep-none-2.png", b"x"),
        ];
        let mut classifier = StubClassifier { calls: 0 };

        let results = process_files(dir.path(), "req", &files, &mut classifier);

        // Success and failure paths both leave no temp copy behind.
        assert_eq!(results.len(), 3);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Build a multipart POST to /api/predictions. Each part is
    /// (field name, optional filename, content).
    fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let boundary = "leukoscan-test-boundary";
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_files_field_rejected() {
        let app = crate::create_router(test_state());
        let request = multipart_request(&[("model", None, b"MobileNetV2")]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No file part.");
    }

    #[tokio::test]
    async fn test_all_empty_filenames_rejected() {
        let app = crate::create_router(test_state());
        let request = multipart_request(&[
            ("files", Some(""), b"bytes"),
            ("model", None, b"MobileNetV2"),
        ]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "At least one image file is required."
        );
    }

    #[tokio::test]
    async fn test_unknown_model_rejected() {
        let app = crate::create_router(test_state());
        let request = multipart_request(&[
            ("files", Some("cell.png"), b"bytes"),
            ("model", None, b"ResNet50"),
        ]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid model selected.");
    }

    #[tokio::test]
    async fn test_missing_model_field_rejected() {
        let app = crate::create_router(test_state());
        let request = multipart_request(&[("files", Some("cell.png"), b"bytes")]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid model selected.");
    }

    #[tokio::test]
    async fn test_missing_artifact_surfaces_as_500() {
        // Registered model, but no artifact on disk: the load happens once,
        // before the per-file loop, and maps to an internal error.
        let app = crate::create_router(test_state());
        let request = multipart_request(&[
            ("files", Some("cell.png"), b"bytes"),
            ("model", None, b"MobileNetV2"),
        ]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Failed to load model.");
    }

    #[tokio::test]
    async fn test_model_listing() {
        let app = crate::create_router(test_state());
        let request = Request::builder()
            .uri("/api/models")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(
            json["models"],
            serde_json::json!(["EfficientB0", "EfficientNetB0", "MobileNetV2", "NasNetMobile"])
        );
    }
}
