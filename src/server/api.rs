//! Handlers for the relay routes.
//!
//! `/chat` is the whole product: validate, try the weather path, fall back
//! to the LLM. Each request is independent — no sessions, no history.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::llm::SYSTEM_PROMPT;
use crate::weather::{intent, reply_line};

use super::AppState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": format!("{msg}") }))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// POST /chat
pub(super) async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let text = req.message.as_deref().unwrap_or("").trim();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, json_error("Message is required")).into_response();
    }

    // 1) Weather card path (optional).
    if let Some(service) = &state.weather {
        if let Some(city) = intent::find_weather_city(text) {
            debug!(%city, "weather intent detected");
            return match service.lookup(city).await {
                Ok(Some(card)) => {
                    let reply = reply_line(&card);
                    (StatusCode::OK, Json(json!({ "reply": reply, "ui": card }))).into_response()
                }
                Ok(None) => (
                    StatusCode::OK,
                    Json(json!({
                        "reply": format!("Sorry, I couldn't find weather for '{city}'.")
                    })),
                )
                    .into_response(),
                Err(e) => {
                    warn!(%city, "weather lookup failed: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json_error(format!("Weather lookup failed: {e}")),
                    )
                        .into_response()
                }
            };
        }
    }

    // 2) Normal LLM path.
    match state.llm.complete(text, Some(SYSTEM_PROMPT)).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "reply": reply }))).into_response(),
        Err(e) => {
            warn!("llm request failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, json_error(e)).into_response()
        }
    }
}

/// GET /health
pub(super) async fn health(State(state): State<AppState>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "model": state.model,
            "llm_url": state.llm_url,
        })),
    )
        .into_response()
}
