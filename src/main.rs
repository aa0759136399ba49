//! LeukoScan Classification Server
//!
//! HTTP backend for acute-lymphoblastic-leukemia blood-cell image
//! classification. Clients upload up to six images against one of four
//! pre-registered ONNX models and receive a predicted class label per file.
//!
//! # Architecture
//!
//! ```text
//! client ──▶ Router (Axum)
//!              ├── GET  /api/models       registry keys
//!              └── POST /api/predictions  validate ─▶ load model once
//!                        └── per file: save ─▶ preprocess ─▶ infer ─▶ label
//! ```

mod config;
mod error;
mod handlers;
mod inference;
mod registry;
mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leukoscan_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("LeukoScan server starting...");
    tracing::info!("Models directory: {}", config.models_dir.display());

    // Ensure the uploads directory exists
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    let registry = registry::ModelRegistry::new(config.models_dir.clone());

    let state = AppState {
        config: config.clone(),
        registry,
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub registry: registry::ModelRegistry,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/models", get(handlers::models::list))
        .route("/api/predictions", post(handlers::predictions::predict))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
