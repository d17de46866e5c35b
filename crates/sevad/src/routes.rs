//! API routes for sevad.
//!
//! - POST /v1/chat - the engine entry point
//! - GET /v1/unanswered, DELETE /v1/unanswered/:id - curation queue
//! - GET /v1/health - liveness

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use seva_common::types::UnansweredConversation;
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Final answer string. Media answers carry `[title](url)` links
    /// the UI renders as playable embeds.
    pub answer: String,
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/chat", post(chat))
}

async fn chat(
    State(state): State<AppStateArc>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!("  chat message ({} chars)", req.message.len());
    let answer = state.engine.handle_user_message(&req.message).await;
    Json(ChatResponse { answer })
}

// ============================================================================
// Curation
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UnansweredResponse {
    pub conversations: Vec<UnansweredConversation>,
}

pub fn curation_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/unanswered", get(list_unanswered))
        .route("/v1/unanswered/:id", delete(delete_unanswered))
}

async fn list_unanswered(
    State(state): State<AppStateArc>,
) -> Result<Json<UnansweredResponse>, (StatusCode, String)> {
    let conversations = state.store.list_unanswered().map_err(|e| {
        error!("  failed to list unanswered conversations: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(UnansweredResponse { conversations }))
}

async fn delete_unanswered(
    State(state): State<AppStateArc>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = state.store.delete_unanswered(id).map_err(|e| {
        error!("  failed to delete unanswered conversation {}: {}", id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, format!("no entry with id {}", id)))
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
