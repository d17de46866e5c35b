//! Lookup tools over the knowledge store.
//!
//! Each tool takes a free-text query and returns zero or more records
//! in storage order. A store failure is recovered as an empty result
//! set so the cascade can proceed to the general fallback; it is never
//! surfaced to the caller.

use crate::prompts;
use seva_common::llm::GenerativeClient;
use seva_common::store::KnowledgeStore;
use seva_common::types::{FaqEntry, LocationRecord, MediaItem};
use tracing::{debug, warn};

/// Best-effort query rewrite before FAQ search: compress the question
/// into 3-5 key terms. Falls back to the original query on any failure.
pub async fn rewrite_faq_query(client: &dyn GenerativeClient, query: &str) -> String {
    let response = client
        .call_json(prompts::REWRITE_SYSTEM, query, prompts::REWRITE_SCHEMA)
        .await;

    match response {
        Ok(json) => match json.get("search_query").and_then(|v| v.as_str()) {
            Some(rewritten) if !rewritten.trim().is_empty() => {
                debug!("rewrote FAQ query {:?} -> {:?}", query, rewritten);
                rewritten.trim().to_string()
            }
            _ => query.to_string(),
        },
        Err(e) => {
            debug!("FAQ query rewrite failed, using original query: {}", e);
            query.to_string()
        }
    }
}

/// FAQ search with the optional rewrite step.
pub async fn search_faqs(
    store: &KnowledgeStore,
    client: &dyn GenerativeClient,
    query: &str,
) -> Vec<FaqEntry> {
    let search_query = rewrite_faq_query(client, query).await;
    match store.search_faqs(&search_query) {
        Ok(results) => results,
        Err(e) => {
            warn!("FAQ search failed, treating as no results: {}", e);
            Vec::new()
        }
    }
}

/// PIN-code / location search.
pub fn search_pin_codes(store: &KnowledgeStore, query: &str) -> Vec<LocationRecord> {
    match store.search_pin_codes(query) {
        Ok(results) => results,
        Err(e) => {
            warn!("PIN-code search failed, treating as no results: {}", e);
            Vec::new()
        }
    }
}

/// Media search.
pub fn search_media(store: &KnowledgeStore, query: &str) -> Vec<MediaItem> {
    match store.search_media(query) {
        Ok(results) => results,
        Err(e) => {
            warn!("media search failed, treating as no results: {}", e);
            Vec::new()
        }
    }
}
