//! Shared library for the SevaSphere chatbot: record types, daemon
//! configuration, the SQLite knowledge store and the generative-client
//! abstraction.

pub mod config;
pub mod llm;
pub mod store;
pub mod types;

pub use config::{QualityConfig, SevaConfig};
pub use llm::{FakeGenerativeClient, GenerativeClient, HttpGenerativeClient, LlmError};
pub use store::KnowledgeStore;
pub use types::{FaqEntry, Intent, LocationRecord, MediaItem, MediaKind, UnansweredConversation};
