//! SevaSphere daemon - public-service chatbot engine.
//!
//! Routes free-text questions to curated knowledge sources (FAQ,
//! PIN-code, media) with a generative fallback, and serves the result
//! over a small localhost HTTP API.

use anyhow::Result;
use clap::Parser;
use sevad::engine::quality::QualityGate;
use sevad::engine::ChatEngine;
use sevad::server::{self, AppState};
use seva_common::config::{SevaConfig, DEFAULT_CONFIG_PATH};
use seva_common::llm::HttpGenerativeClient;
use seva_common::store::KnowledgeStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sevad")]
#[command(about = "SevaSphere chatbot daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    info!("SevaSphere daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = SevaConfig::load(&cli.config)?;

    let store = Arc::new(KnowledgeStore::open_at(&config.store.path)?);
    if config.store.seed {
        store.seed_if_empty()?;
    }
    info!(
        "Knowledge store ready: {} FAQs, {} PIN codes, {} media items",
        store.list_faqs()?.len(),
        store.list_pin_codes()?.len(),
        store.list_media()?.len()
    );

    let client = Arc::new(
        HttpGenerativeClient::new(config.llm.clone())
            .map_err(|e| anyhow::anyhow!("failed to build generative client: {}", e))?,
    );
    info!(
        "Generative backend: {} (model {})",
        config.llm.endpoint, config.llm.model
    );

    let engine = ChatEngine::new(store.clone(), client, QualityGate::new(&config.quality));
    let state = AppState::new(engine, store);

    server::run(state, &config.server.listen_addr).await
}
