//! The query-routing and fallback-resolution engine.
//!
//! A single entry point, `ChatEngine::handle_user_message`, drives the
//! cascade: DirectMatch -> ToolAnswer -> QualityGate -> GeneralFallback
//! -> Terminal. Every question that could not be answered from curated
//! data is appended to the unanswered-conversation log for curation.
//! No error or panic escapes the entry point; every path ends in a
//! non-empty string.

pub mod intent;
pub mod pattern;
pub mod quality;
pub mod responders;
pub mod tools;

use crate::prompts;
use quality::QualityGate;
use seva_common::llm::GenerativeClient;
use seva_common::store::KnowledgeStore;
use seva_common::types::Intent;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Terminal failure reply when even the general responder fails.
const TERMINAL_APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

/// Fixed reply when the joke responder fails. Jokes are a shortcut,
/// not a question, so this path never logs or cascades.
const JOKE_APOLOGY: &str =
    "Sorry, I couldn't think of a joke right now. Please try again later.";

/// Reply to an empty or whitespace-only message.
const EMPTY_MESSAGE_REPLY: &str =
    "Please type a question and I'll do my best to help.";

/// Notice appended to fallback answers so users know their question
/// was queued for curation.
const REVIEW_NOTICE: &str =
    "(I've logged your question so our team can improve future answers.)";

/// The chatbot engine. Stateless between calls; shared as `Arc`
/// across concurrent requests.
pub struct ChatEngine {
    store: Arc<KnowledgeStore>,
    client: Arc<dyn GenerativeClient>,
    gate: QualityGate,
}

impl ChatEngine {
    pub fn new(
        store: Arc<KnowledgeStore>,
        client: Arc<dyn GenerativeClient>,
        gate: QualityGate,
    ) -> Self {
        Self { store, client, gate }
    }

    /// Answer a user message. Always returns a non-empty string.
    pub async fn handle_user_message(&self, message: &str) -> String {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_MESSAGE_REPLY.to_string();
        }

        // DirectMatch: an isolated 6-digit run outranks everything.
        if let Some(pin_code) = pattern::extract_pin_code(message) {
            return self.answer_pin_code(message, &pin_code).await;
        }

        // Joke shortcut: second in precedence, never logged.
        if pattern::is_joke_request(message) {
            return match responders::joke(self.client.as_ref()).await {
                Ok(joke) => joke,
                Err(e) => {
                    warn!("joke responder failed: {}", e);
                    JOKE_APOLOGY.to_string()
                }
            };
        }

        // ToolAnswer: classify and invoke the single matching tool.
        let intent = intent::classify(self.client.as_ref(), message).await;
        debug!("classified {:?} as {}", message, intent.as_str());

        let candidate = match intent {
            Intent::Faq => {
                let results =
                    tools::search_faqs(&self.store, self.client.as_ref(), message).await;
                if results.is_empty() {
                    None
                } else {
                    Some(prompts::format_faq_answer(&results))
                }
            }
            Intent::Pincode => {
                let results = tools::search_pin_codes(&self.store, message);
                if results.is_empty() {
                    None
                } else {
                    Some(prompts::format_location_answer(&results))
                }
            }
            Intent::Media => {
                let results = tools::search_media(&self.store, message);
                if results.is_empty() {
                    None
                } else {
                    Some(responders::media_answer(self.client.as_ref(), message, &results).await)
                }
            }
            // Social openers and unclassifiable messages go straight
            // to the general responder.
            Intent::Greeting | Intent::Other => None,
        };

        // QualityGate: tool-grounded answers that pass are returned
        // untouched and unlogged.
        if let Some(answer) = candidate {
            match self.gate.check(&answer) {
                Ok(()) => return answer,
                Err(rejection) => {
                    info!("quality gate rejected tool answer: {:?}", rejection);
                }
            }
        }

        self.general_fallback(message).await
    }

    /// Direct PIN-code path. A grounded explanation is returned
    /// unlogged; an ungrounded one (no stored info) is always logged
    /// before returning, because the answer did not come from curated
    /// data.
    async fn answer_pin_code(&self, message: &str, pin_code: &str) -> String {
        let info = match self.store.pin_code_info(pin_code) {
            Ok(info) => info,
            Err(e) => {
                warn!("PIN-code lookup failed, treating as no stored info: {}", e);
                None
            }
        };
        let grounded = info.is_some();

        match responders::pin_explanation(self.client.as_ref(), pin_code, info.as_deref()).await {
            Ok(explanation) => {
                if !grounded {
                    self.log_unanswered(&format!("PIN code: {}", pin_code), Some(&explanation));
                }
                explanation
            }
            Err(e) => {
                warn!("PIN explanation failed for {}: {}", pin_code, e);
                self.general_fallback(message).await
            }
        }
    }

    /// Terminal stage: general-knowledge answer, always logged.
    async fn general_fallback(&self, message: &str) -> String {
        match responders::general_answer(self.client.as_ref(), message).await {
            Ok(answer) => {
                self.log_unanswered(message, Some(&answer));
                format!("{}\n\n{}", answer, REVIEW_NOTICE)
            }
            Err(e) => {
                warn!("general responder failed: {}", e);
                self.log_unanswered(message, None);
                TERMINAL_APOLOGY.to_string()
            }
        }
    }

    /// Append to the unanswered log. A failed write must never block
    /// or alter the user-visible answer, so it is only warned about.
    fn log_unanswered(&self, query: &str, answer: Option<&str>) {
        if let Err(e) = self.store.add_unanswered(query, answer) {
            warn!("failed to log unanswered conversation: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seva_common::llm::{FakeGenerativeClient, LlmError};
    use seva_common::types::MediaKind;

    fn seeded_store() -> Arc<KnowledgeStore> {
        let store = KnowledgeStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        Arc::new(store)
    }

    fn engine_with(
        store: Arc<KnowledgeStore>,
        client: Arc<FakeGenerativeClient>,
    ) -> ChatEngine {
        ChatEngine::new(store, client, QualityGate::default())
    }

    #[tokio::test]
    async fn test_seeded_pin_code_is_grounded_and_unlogged() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_valid(serde_json::json!({
            "explanation": "Connaught Place is the commercial heart of New Delhi."
        })));
        let engine = engine_with(store.clone(), client.clone());

        let answer = engine.handle_user_message("110001").await;
        assert!(answer.contains("Connaught Place"));
        assert_eq!(store.count_unanswered().unwrap(), 0);
        // The stored info reached the responder prompt
        assert!(client.prompts()[0].contains("Connaught Place"));
        // Only the explanation call was made; no classification
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unseeded_pin_code_is_answered_and_logged() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_valid(serde_json::json!({
            "explanation": "I don't have curated records, but this code lies in northern India."
        })));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("999999").await;
        assert!(!answer.is_empty());

        let logged = store.list_unanswered().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].query, "PIN code: 999999");
        assert!(logged[0].answer.is_some());
    }

    #[tokio::test]
    async fn test_pin_outranks_joke_trigger() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_valid(serde_json::json!({
            "explanation": "A well known area of Mumbai's Fort district."
        })));
        let engine = engine_with(store.clone(), client.clone());

        let answer = engine
            .handle_user_message("tell me a joke about 400001")
            .await;
        assert!(answer.contains("Fort district"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_joke_shortcut_is_never_logged() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_valid(serde_json::json!({
            "joke": "Why did the scarecrow win an award? He was outstanding in his field."
        })));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("tell me a joke").await;
        assert!(answer.contains("scarecrow"));
        assert_eq!(store.count_unanswered().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_joke_failure_returns_fixed_apology() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_error(LlmError::Timeout(30)));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("any jokes?").await;
        assert_eq!(answer, JOKE_APOLOGY);
        assert_eq!(store.count_unanswered().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_matching_faq_is_answered_from_store_unlogged() {
        let store = seeded_store();
        // Call order: classify, then FAQ query rewrite
        let client = Arc::new(FakeGenerativeClient::new(vec![
            Ok(serde_json::json!({"intent": "faq"})),
            Ok(serde_json::json!({"search_query": "SevaSphere"})),
        ]));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("What is SevaSphere?").await;
        assert!(answer.contains("SevaSphere is a chatbot"));
        assert_eq!(store.count_unanswered().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_pincode_intent_without_digits_searches_by_place() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_valid(
            serde_json::json!({"intent": "pincode"}),
        ));
        let engine = engine_with(store.clone(), client);

        let answer = engine
            .handle_user_message("what can you tell me about Hazratganj in Lucknow")
            .await;
        assert!(answer.contains("226001"));
        assert_eq!(store.count_unanswered().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_media_answer_keeps_link_contract() {
        let store = seeded_store();
        store
            .add_media(
                "Crop insurance explained",
                MediaKind::Video,
                "agriculture",
                "https://example.org/v/crop",
            )
            .unwrap();
        let client = Arc::new(FakeGenerativeClient::new(vec![
            Ok(serde_json::json!({"intent": "media"})),
            Ok(serde_json::json!({
                "answer": "Here you go: [Crop insurance explained](https://example.org/v/crop)"
            })),
        ]));
        let engine = engine_with(store.clone(), client);

        let answer = engine
            .handle_user_message("show me a video about crop insurance")
            .await;
        assert!(answer.contains("[Crop insurance explained](https://example.org/v/crop)"));
        assert_eq!(store.count_unanswered().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_tool_results_falls_back_and_logs_once() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::new(vec![
            Ok(serde_json::json!({"intent": "faq"})),
            Ok(serde_json::json!({"search_query": "zzkqjx"})),
            Ok(serde_json::json!({"answer": "I can only guess, but here is my best effort."})),
        ]));
        let engine = engine_with(store.clone(), client);

        let message = "asdkjhasd random gibberish";
        let answer = engine.handle_user_message(message).await;
        assert!(answer.contains("best effort"));
        assert!(answer.contains(REVIEW_NOTICE));

        let logged = store.list_unanswered().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].query, message);
    }

    #[tokio::test]
    async fn test_quality_gate_rejection_triggers_fallback() {
        let store = Arc::new(KnowledgeStore::open_in_memory().unwrap());
        store.add_faq("Open?", "Yes.").unwrap();
        let client = Arc::new(FakeGenerativeClient::new(vec![
            Ok(serde_json::json!({"intent": "faq"})),
            Ok(serde_json::json!({"search_query": "open"})),
            Ok(serde_json::json!({
                "answer": "Office hours are 9am to 5pm on working days."
            })),
        ]));
        let engine = engine_with(store.clone(), client);

        // The concatenated FAQ answer "Q: Open?\nA: Yes." is too short
        // for the gate, so the general responder takes over.
        let answer = engine.handle_user_message("is the office open").await;
        assert!(answer.contains("9am to 5pm"));
        assert_eq!(store.count_unanswered().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_greeting_goes_to_general_fallback() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::new(vec![
            Ok(serde_json::json!({"intent": "greeting"})),
            Ok(serde_json::json!({"answer": "Hello! Ask me about services or PIN codes."})),
        ]));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("namaste!").await;
        assert!(answer.contains("Hello!"));
        assert_eq!(store.count_unanswered().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_total_failure_ends_in_terminal_apology() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_error(LlmError::Http(
            "connection refused".into(),
        )));
        let engine = engine_with(store.clone(), client);

        let answer = engine.handle_user_message("what is the meaning of life").await;
        assert_eq!(answer, TERMINAL_APOLOGY);

        // Best-effort log with no answer text
        let logged = store.list_unanswered().unwrap();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].answer.is_none());
    }

    #[tokio::test]
    async fn test_empty_message_is_a_fixed_reply_without_llm_calls() {
        let store = seeded_store();
        let client = Arc::new(FakeGenerativeClient::always_error(LlmError::Disabled));
        let engine = engine_with(store.clone(), client.clone());

        let answer = engine.handle_user_message("   ").await;
        assert_eq!(answer, EMPTY_MESSAGE_REPLY);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_every_path_returns_nonempty() {
        let store = seeded_store();
        for message in [
            "110001",
            "999999",
            "tell me a joke",
            "What is SevaSphere?",
            "complete gibberish qqq",
            "",
        ] {
            let client = Arc::new(FakeGenerativeClient::always_error(LlmError::Empty));
            let engine = engine_with(store.clone(), client);
            let answer = engine.handle_user_message(message).await;
            assert!(!answer.is_empty(), "empty answer for {:?}", message);
        }
    }
}
