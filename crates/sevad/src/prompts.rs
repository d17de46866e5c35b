//! Prompt and schema definitions for the five responder roles.
//!
//! Every role goes through the same generative call (prompt + JSON
//! schema description); only the instructions differ. Prompts are
//! grounded-first: when curated records are supplied, the model must
//! answer from them and never substitute outside knowledge.

use seva_common::types::{FaqEntry, LocationRecord, MediaItem};

/// Intent classification: one enum value, nothing else.
pub const INTENT_SYSTEM: &str = "\
You are the intent router for a public-service chatbot. Classify the \
user's message into exactly one intent:
- \"media\": the user asks for a video, image, or reel about some topic.
- \"pincode\": the user asks about a location, place, village, city, or mentions a PIN code.
- \"faq\": a general informational question about services, schemes, or processes.
- \"greeting\": a purely social opener with no information request (hi, hello, namaste).
- \"other\": anything that fits none of the above.
Respond with the intent only.";

pub const INTENT_SCHEMA: &str = r#"{"intent": "faq" | "pincode" | "media" | "greeting" | "other"}"#;

/// FAQ query rewriting: compress a question into search key terms.
pub const REWRITE_SYSTEM: &str = "\
Analyze the user's question and generate a concise search query of 3-5 \
key terms that can be used to find the most relevant answer in a \
database. Output the key terms separated by spaces, nothing else.";

pub const REWRITE_SCHEMA: &str = r#"{"search_query": "<3-5 key terms>"}"#;

/// Tool-augmented media answer: format grounded results as markdown links.
pub const MEDIA_ANSWER_SYSTEM: &str = "\
You are a helpful assistant for a public-service chatbot. The user asked \
for media content and a database search already ran; the results are \
included below. Pick the most relevant result and present it as a clean \
markdown link, for example: \"I found this for you: [Title](URL)\". \
Never output raw data, never invent titles or URLs that are not in the \
results, and include at most three links.";

pub const MEDIA_ANSWER_SCHEMA: &str = r#"{"answer": "<reply containing [title](url) links>"}"#;

/// General-knowledge terminal fallback.
pub const GENERAL_SYSTEM: &str = "\
You are a helpful AI assistant for a public-service chatbot. Provide a \
clear, concise, and accurate answer to the user's question. If you are \
not certain, say so.";

pub const GENERAL_SCHEMA: &str = r#"{"answer": "<the answer to the user's question>"}"#;

/// PIN-code significance explanation.
pub const PIN_EXPLANATION_SYSTEM: &str = "\
You are an expert in local Indian geography and history. Explain the \
significance of the given PIN code, focusing on historical, cultural, \
and geographical aspects. Keep the explanation concise and easy to \
understand. When local information is provided, use it as the primary \
source; when none is provided, rely on your own knowledge and still \
give a best-effort explanation rather than refusing.";

pub const PIN_EXPLANATION_SCHEMA: &str = r#"{"explanation": "<significance of the PIN code>"}"#;

/// Joke responder.
pub const JOKE_SYSTEM: &str = "Tell a random, family-friendly joke.";

pub const JOKE_SCHEMA: &str = r#"{"joke": "<a short family-friendly joke>"}"#;

/// Build the user prompt for the PIN explanation role.
pub fn pin_explanation_prompt(pin_code: &str, info: Option<&str>) -> String {
    match info {
        Some(info) => format!("PIN code: {}\n\nLocal information: {}", pin_code, info),
        None => format!(
            "PIN code: {}\n\nNo local information available. Answer from your own knowledge.",
            pin_code
        ),
    }
}

/// Build the user prompt for the media-answer role.
pub fn media_answer_prompt(query: &str, results: &[MediaItem]) -> String {
    let mut prompt = format!("User request: {}\n\nSearch results:\n", query);
    for item in results {
        prompt.push_str(&format!(
            "- title: {} | type: {} | url: {}\n",
            item.title, item.kind, item.url
        ));
    }
    prompt
}

/// Concatenate FAQ matches into a grounded answer.
pub fn format_faq_answer(results: &[FaqEntry]) -> String {
    results
        .iter()
        .map(|faq| format!("Q: {}\nA: {}", faq.question, faq.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Concatenate location matches into a grounded answer.
pub fn format_location_answer(results: &[LocationRecord]) -> String {
    results
        .iter()
        .map(|rec| format!("{}: {}", rec.pincode, rec.info))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Deterministic `[title](url)` rendering, used when the formatting
/// call fails. The markdown-link shape is a wire contract with the
/// chat UI and must be preserved.
pub fn format_media_links(results: &[MediaItem]) -> String {
    let links = results
        .iter()
        .map(|item| format!("[{}]({})", item.title, item.url))
        .collect::<Vec<_>>()
        .join(", ");
    format!("I found this for you: {}", links)
}
