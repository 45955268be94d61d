//! Axum HTTP surface — the relay's two routes.
//!
//! `run()` drives the axum event loop; a [`CancellationToken`] is wired to
//! axum's graceful shutdown so Ctrl-C drains in-flight requests.
//!
//! ## URL layout
//!
//! ```text
//! POST /chat    — relay a message (weather card or LLM reply)
//! GET  /health  — liveness + active model info
//! ```
//!
//! CORS is wide open: the relay fronts a browser dev server on another
//! origin, and nothing here is authenticated.

mod api;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::AppError;
use crate::llm::LlmProvider;
use crate::weather::WeatherService;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone — the provider and service are reference-counted inside.
#[derive(Clone)]
pub struct AppState {
    /// Active LLM backend.
    pub llm: LlmProvider,
    /// Weather lookups; `None` when disabled in config.
    pub weather: Option<WeatherService>,
    /// Model name reported by `/health`.
    pub model: String,
    /// Chat-completions endpoint reported by `/health`.
    pub llm_url: String,
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn run(addr: &str, state: AppState, shutdown: CancellationToken) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "relay listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("relay shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(api::chat))
        .route("/health", get(api::health))
        .layer(cors)
        .with_state(state)
}
