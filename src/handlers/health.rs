//! Health check handler
//!
//! Liveness probe reporting the registry size and whether the models
//! directory is present on disk.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    registered_models: usize,
    models_dir_exists: bool,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        registered_models: state.registry.model_names().len(),
        models_dir_exists: state.config.models_dir.is_dir(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, registry::ModelRegistry, AppState};

    #[tokio::test]
    async fn test_health_reports_registry_size() {
        let config = Config {
            port: 0,
            models_dir: std::env::temp_dir().join("leukoscan-health-no-models"),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: 1024,
        };
        let registry = ModelRegistry::new(config.models_dir.clone());
        let state = AppState { config, registry };

        let response = check(State(state)).await;
        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.registered_models, 4);
        assert!(!response.0.models_dir_exists);
    }
}
