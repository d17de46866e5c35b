//! HTTP server for sevad.

use crate::engine::ChatEngine;
use crate::routes;
use anyhow::Result;
use axum::Router;
use seva_common::store::KnowledgeStore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub engine: ChatEngine,
    pub store: Arc<KnowledgeStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: ChatEngine, store: Arc<KnowledgeStore>) -> Self {
        Self {
            engine,
            store,
            start_time: Instant::now(),
        }
    }
}

/// Run the HTTP server until shutdown.
pub async fn run(state: AppState, listen_addr: &str) -> Result<()> {
    let state = Arc::new(state);

    let app = Router::new()
        .merge(routes::chat_routes())
        .merge(routes::curation_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Localhost by default; the chat UI proxies to us
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("  Listening on http://{}", listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
