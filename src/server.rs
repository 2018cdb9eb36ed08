//! HTTP surface: Telegram webhook, local upload endpoint, health check.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /`, `GET /health` | fixed liveness payload |
//! | `POST /webhook` | Telegram update; always `200 {"status":"ok"}` once parsed |
//! | `POST /upload` | multipart image for local testing; returns the extracted text |
//!
//! The webhook answers `400` only when the body is not an update at all.
//! Every downstream failure is handled by the dispatcher and still
//! acknowledged, since Telegram redelivers anything that is not a `2xx`.

use crate::dispatch::Dispatcher;
use crate::error::RelayError;
use crate::telegram::Update;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Content types `/upload` accepts.
pub const ALLOWED_UPLOAD_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Multipart field `/upload` reads the image from.
pub const UPLOAD_FIELD: &str = "image";

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Build the application router.
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { dispatcher })
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl-C / SIGTERM.
pub async fn serve(dispatcher: Dispatcher) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], dispatcher.config().port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Starting server");

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Shutdown signal received");
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Bot is live 🚀",
        "status": "healthy",
    }))
}

async fn webhook(State(state): State<AppState>, body: Bytes) -> Response {
    let update: Update = match serde_json::from_slice(&body).map_err(RelayError::MalformedRequest) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Error parsing webhook");
            return ApiError::new(StatusCode::BAD_REQUEST, "Invalid JSON").into_response();
        }
    };

    let outcome = state.dispatcher.handle_update(&update).await;
    info!(update_id = update.update_id, ?outcome, "Update handled");

    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub text: String,
    pub file_name: String,
    pub size: usize,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) && field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
        file = Some((content_type, file_name, bytes));
        break;
    }

    let Some((content_type, file_name, bytes)) = file else {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "No image file provided"));
    };

    if !ALLOWED_UPLOAD_TYPES.contains(&content_type.as_str()) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Unsupported file type: {content_type}"),
        ));
    }

    let size = bytes.len();
    info!(file_name = %file_name, size, content_type = %content_type, "Upload received");

    let text = state
        .dispatcher
        .extract_upload(&content_type, bytes.to_vec())
        .await
        .map_err(|e| {
            warn!(error = %e, "Error extracting text from upload");
            ApiError::new(StatusCode::BAD_GATEWAY, "Failed to extract text from image")
        })?;

    state.dispatcher.relay_upload_result(&text).await;

    Ok(Json(UploadResponse {
        text,
        file_name,
        size,
    }))
}

/// `{"error": message}` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
