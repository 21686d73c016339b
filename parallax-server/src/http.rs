//! HTTP delivery: one-shot frame upload plus liveness
//!
//! `POST /predict` accepts a multipart upload of one encoded image and
//! responds with `{"objects": [...]}`. Failures keep the `{"error": ...}`
//! body shape but carry a real status code.

use crate::config::ServerConfig;
use crate::websocket::websocket_handler;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use parallax_core::{Error, FormatOptions};
use parallax_vision::FrameProcessor;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, warn};

/// Shared state for both delivery modes.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<FrameProcessor>,
    pub http_options: FormatOptions,
    pub ws_options: FormatOptions,
}

impl AppState {
    pub fn new(processor: Arc<FrameProcessor>, config: &ServerConfig) -> Self {
        Self {
            processor,
            http_options: FormatOptions {
                round_distance: config.round_distance_http,
            },
            ws_options: FormatOptions {
                round_distance: config.round_distance_ws,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the router: upload endpoint, frame stream, health, permissive CORS.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// One-shot prediction over an uploaded image.
async fn predict_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => {
            warn!("Predict request without a file field");
            return error_body(
                StatusCode::UNPROCESSABLE_ENTITY,
                "No file field in request".to_string(),
            );
        }
        Err(e) => {
            warn!("Malformed multipart request: {}", e);
            return error_body(
                StatusCode::BAD_REQUEST,
                format!("Invalid multipart body: {}", e),
            );
        }
    };

    let bytes = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to read uploaded file: {}", e);
            return error_body(
                StatusCode::BAD_REQUEST,
                format!("Failed to read upload: {}", e),
            );
        }
    };
    debug!("Predict request: {} bytes", bytes.len());

    let processor = state.processor.clone();
    let options = state.http_options;
    match tokio::task::spawn_blocking(move || processor.process(&bytes, options)).await {
        Ok(Ok(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(Err(e)) => error_response(e),
        Err(e) => {
            error!("Frame processing task failed: {}", e);
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal processing failure".to_string(),
            )
        }
    }
}

/// Map the error taxonomy onto statuses while preserving the body shape.
fn error_response(err: Error) -> Response {
    let status = match &err {
        Error::Decode(_) | Error::InvalidFrame(_) => StatusCode::BAD_REQUEST,
        Error::Model(_) | Error::Configuration(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    if status.is_server_error() {
        error!("Predict failed: {}", err);
    } else {
        warn!("Predict rejected: {}", err);
    }
    error_body(status, err.to_string())
}

fn error_body(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}
