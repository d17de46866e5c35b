//! Core record types shared between the daemon, the store and the CLI.
//!
//! These mirror the knowledge-store tables one to one:
//! - `FaqEntry` - curated question/answer pairs
//! - `LocationRecord` - PIN code -> local information
//! - `MediaItem` - curated videos, images and reels
//! - `UnansweredConversation` - questions the engine could not ground

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A curated FAQ entry. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// Local information keyed by a 6-digit postal PIN code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub pincode: String,
    pub info: String,
}

/// Kind of a curated media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Reel,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Reel => "reel",
        }
    }

    /// Parse the store's TEXT column value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "video" => Some(Self::Video),
            "image" => Some(Self::Image),
            "reel" => Some(Self::Reel),
            _ => None,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curated media item. The engine renders matches as `[title](url)`
/// markdown links; the chat UI parses that format to embed players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub category: String,
    pub url: String,
}

/// A question the engine answered without curated grounding (or not at
/// all). Written only by the orchestrator; reviewed and deleted by
/// curators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnansweredConversation {
    pub id: i64,
    pub query: String,
    /// Best-effort answer that was still judged insufficient or
    /// unverified. None when no answer could be produced at all.
    pub answer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Transient routing intent for a single message. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// General informational question -> FAQ search
    Faq,
    /// Location/place/PIN mention -> PIN-code search
    Pincode,
    /// Video/image/reel request -> media search
    Media,
    /// Purely social opener
    Greeting,
    /// Anything else (also the failure default)
    Other,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::Pincode => "pincode",
            Self::Media => "media",
            Self::Greeting => "greeting",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "faq" => Some(Self::Faq),
            "pincode" => Some(Self::Pincode),
            "media" => Some(Self::Media),
            "greeting" => Some(Self::Greeting),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_round_trip() {
        for kind in [MediaKind::Video, MediaKind::Image, MediaKind::Reel] {
            assert_eq!(MediaKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::parse("podcast"), None);
    }

    #[test]
    fn test_intent_parse_is_lenient_about_case() {
        assert_eq!(Intent::parse("FAQ"), Some(Intent::Faq));
        assert_eq!(Intent::parse("  media "), Some(Intent::Media));
        assert_eq!(Intent::parse("pin"), None);
    }

    #[test]
    fn test_intent_serde_uses_lowercase() {
        let json = serde_json::to_string(&Intent::Pincode).unwrap();
        assert_eq!(json, "\"pincode\"");
        let parsed: Intent = serde_json::from_str("\"greeting\"").unwrap();
        assert_eq!(parsed, Intent::Greeting);
    }
}
