//! Generative responder roles.
//!
//! Thin wrappers over `GenerativeClient::call_json` that extract the
//! role's output field. Errors propagate to the orchestrator, which
//! decides which fallback stage comes next.

use crate::prompts;
use seva_common::llm::{GenerativeClient, LlmError};
use seva_common::types::MediaItem;

fn extract_field(json: serde_json::Value, field: &str) -> Result<String, LlmError> {
    match json.get(field).and_then(|v| v.as_str()) {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(LlmError::Empty),
    }
}

/// Terminal general-knowledge answer from the raw query alone.
pub async fn general_answer(
    client: &dyn GenerativeClient,
    query: &str,
) -> Result<String, LlmError> {
    let json = client
        .call_json(prompts::GENERAL_SYSTEM, query, prompts::GENERAL_SCHEMA)
        .await?;
    extract_field(json, "answer")
}

/// Prose explanation of a PIN code's significance. With no stored info
/// the model answers from open knowledge instead of refusing.
pub async fn pin_explanation(
    client: &dyn GenerativeClient,
    pin_code: &str,
    info: Option<&str>,
) -> Result<String, LlmError> {
    let prompt = prompts::pin_explanation_prompt(pin_code, info);
    let json = client
        .call_json(
            prompts::PIN_EXPLANATION_SYSTEM,
            &prompt,
            prompts::PIN_EXPLANATION_SCHEMA,
        )
        .await?;
    extract_field(json, "explanation")
}

/// A short family-friendly joke.
pub async fn joke(client: &dyn GenerativeClient) -> Result<String, LlmError> {
    let json = client
        .call_json(prompts::JOKE_SYSTEM, "Tell me a joke.", prompts::JOKE_SCHEMA)
        .await?;
    extract_field(json, "joke")
}

/// Format grounded media results as a reply with `[title](url)` links.
///
/// The markdown-link shape is a wire contract with the chat UI, so a
/// failed or contract-breaking generative call falls back to
/// deterministic local formatting instead of discarding the grounded
/// results.
pub async fn media_answer(
    client: &dyn GenerativeClient,
    query: &str,
    results: &[MediaItem],
) -> String {
    let prompt = prompts::media_answer_prompt(query, results);
    let formatted = client
        .call_json(prompts::MEDIA_ANSWER_SYSTEM, &prompt, prompts::MEDIA_ANSWER_SCHEMA)
        .await
        .and_then(|json| extract_field(json, "answer"));

    match formatted {
        // The reply must actually carry a link to at least one result.
        Ok(answer) if results.iter().any(|item| answer.contains(&item.url)) => answer,
        _ => prompts::format_media_links(results),
    }
}
