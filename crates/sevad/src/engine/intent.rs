//! Intent routing for messages that had no direct pattern match.
//!
//! Classification is delegated to the generative backend with a
//! constrained enum schema. Any failure past this point would stall
//! the cascade, so the failure default is always `Intent::Other`.

use crate::prompts;
use seva_common::llm::GenerativeClient;
use seva_common::types::Intent;
use tracing::warn;

/// Classify a message into exactly one intent.
///
/// Never fails: classifier errors and non-enumerated values both
/// degrade to `Intent::Other`.
pub async fn classify(client: &dyn GenerativeClient, message: &str) -> Intent {
    let response = client
        .call_json(prompts::INTENT_SYSTEM, message, prompts::INTENT_SCHEMA)
        .await;

    match response {
        Ok(json) => match json.get("intent").and_then(|v| v.as_str()) {
            Some(raw) => Intent::parse(raw).unwrap_or_else(|| {
                warn!("classifier returned non-enumerated intent {:?}, defaulting to other", raw);
                Intent::Other
            }),
            None => {
                warn!("classifier response missing intent field, defaulting to other");
                Intent::Other
            }
        },
        Err(e) => {
            warn!("intent classification failed, defaulting to other: {}", e);
            Intent::Other
        }
    }
}
