//! SQLite-backed knowledge store.
//!
//! Four tables back the engine and the curation surfaces:
//! - faqs: curated question/answer pairs
//! - pincodes: PIN code -> local information
//! - media: curated videos, images and reels
//! - unanswered_conversations: engine-written curation queue
//!
//! Searches are deliberately permissive: OR of case-insensitive
//! substring matches per whitespace token, to maximize recall. WAL
//! mode gives concurrent readers; the connection mutex serializes
//! writers.

use crate::types::{FaqEntry, LocationRecord, MediaItem, MediaKind, UnansweredConversation};
use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use std::sync::Mutex;

/// Seed FAQ entries for a fresh database
const SEED_FAQS: &[(&str, &str)] = &[
    (
        "What is SevaSphere?",
        "SevaSphere is a chatbot designed to provide information about government services, \
         local village details via PIN codes, and answer frequently asked questions in both \
         English and Hindi.",
    ),
    (
        "How do I check information for my village?",
        "Simply type in the 6-digit PIN code of your area, and SevaSphere will provide you \
         with relevant geographical and historical information.",
    ),
    (
        "Which languages are supported?",
        "SevaSphere supports both English and Hindi. You can ask questions in either language.",
    ),
    (
        "What kind of government services information can I get?",
        "You can ask about various central and state government schemes, application \
         processes, and eligibility criteria. For example, 'How to apply for a ration card?'",
    ),
    (
        "Is this service free?",
        "Yes, SevaSphere is completely free to use.",
    ),
];

/// Seed PIN-code records for a fresh database
const SEED_PINCODES: &[(&str, &str)] = &[
    (
        "110001",
        "This PIN code corresponds to the area of Connaught Place in New Delhi. It is a \
         major financial, commercial and business center. Historically, it was developed as \
         a showpiece of Lutyens' Delhi.",
    ),
    (
        "400001",
        "This PIN code covers the Fort area in Mumbai. It is the heart of the city's \
         financial district and is home to many historical landmarks, including the \
         Chhatrapati Shivaji Maharaj Terminus (CST), a UNESCO World Heritage Site.",
    ),
    (
        "700001",
        "This PIN code is for the Dalhousie Square area in Kolkata, now known as \
         B. B. D. Bagh. It was the administrative heart of British India and contains many \
         iconic colonial-era buildings like the Writers' Building.",
    ),
    (
        "600001",
        "This PIN code represents the Parrys Corner area in Chennai. It is one of the \
         oldest parts of the city and a bustling commercial hub. The name comes from \
         'Parry & Co.', one of the oldest mercantile names in Chennai.",
    ),
    (
        "226001",
        "This PIN code corresponds to the Hazratganj area in Lucknow. It is a major \
         commercial and shopping hub in the city, known for its Victorian-style \
         architecture and vibrant atmosphere. It was established by Amjad Ali Shah, the \
         fourth king of Oudh.",
    ),
];

/// SQLite knowledge store handle, shareable across async tasks.
pub struct KnowledgeStore {
    conn: Mutex<Connection>,
}

impl KnowledgeStore {
    /// Open or create the database at a path and run schema setup.
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS faqs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pincodes (
                pincode TEXT PRIMARY KEY,
                info TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS media (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                type TEXT NOT NULL CHECK(type IN ('video', 'image', 'reel')),
                category TEXT NOT NULL DEFAULT 'general',
                url TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS unanswered_conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                query TEXT NOT NULL,
                answer TEXT,
                timestamp TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned mutex means a panic mid-statement; propagating the
        // inner guard is still safe for SQLite.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert seed FAQs and PIN codes if the tables are empty.
    pub fn seed_if_empty(&self) -> Result<()> {
        let conn = self.conn();
        let tx = conn.unchecked_transaction()?;

        let faq_count: i64 = tx.query_row("SELECT COUNT(*) FROM faqs", [], |row| row.get(0))?;
        if faq_count == 0 {
            let mut stmt = tx.prepare("INSERT INTO faqs (question, answer) VALUES (?1, ?2)")?;
            for (question, answer) in SEED_FAQS {
                stmt.execute(params![question, answer])?;
            }
        }

        let pin_count: i64 = tx.query_row("SELECT COUNT(*) FROM pincodes", [], |row| row.get(0))?;
        if pin_count == 0 {
            let mut stmt = tx.prepare("INSERT INTO pincodes (pincode, info) VALUES (?1, ?2)")?;
            for (pincode, info) in SEED_PINCODES {
                stmt.execute(params![pincode, info])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Split a query into non-empty whitespace tokens, as LIKE patterns.
    fn like_patterns(query: &str) -> Vec<String> {
        query
            .split_whitespace()
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", t))
            .collect()
    }

    // ------------------------------------------------------------------
    // Search (engine-facing, read-only)
    // ------------------------------------------------------------------

    /// Token OR-substring search over question+answer.
    pub fn search_faqs(&self, query: &str) -> Result<Vec<FaqEntry>> {
        let patterns = Self::like_patterns(query);
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<String> = (1..=patterns.len())
            .map(|i| format!("(question LIKE ?{n} OR answer LIKE ?{n})", n = i))
            .collect();
        let sql = format!(
            "SELECT id, question, answer FROM faqs WHERE {}",
            clauses.join(" OR ")
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(patterns.iter()), |row| {
            Ok(FaqEntry {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Token OR-substring search over pincode+info.
    pub fn search_pin_codes(&self, query: &str) -> Result<Vec<LocationRecord>> {
        let patterns = Self::like_patterns(query);
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<String> = (1..=patterns.len())
            .map(|i| format!("(pincode LIKE ?{n} OR info LIKE ?{n})", n = i))
            .collect();
        let sql = format!(
            "SELECT pincode, info FROM pincodes WHERE {}",
            clauses.join(" OR ")
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(patterns.iter()), |row| {
            Ok(LocationRecord {
                pincode: row.get(0)?,
                info: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Token OR-substring search over title+category.
    pub fn search_media(&self, query: &str) -> Result<Vec<MediaItem>> {
        let patterns = Self::like_patterns(query);
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<String> = (1..=patterns.len())
            .map(|i| format!("(title LIKE ?{n} OR category LIKE ?{n})", n = i))
            .collect();
        let sql = format!(
            "SELECT id, title, type, category, url FROM media WHERE {}",
            clauses.join(" OR ")
        );

        let conn = self.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(patterns.iter()), |row| {
            let kind_raw: String = row.get(2)?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                kind_raw,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, title, kind_raw, category, url) = row?;
            let kind = MediaKind::parse(&kind_raw)
                .ok_or_else(|| anyhow!("unknown media type in store: {}", kind_raw))?;
            items.push(MediaItem {
                id,
                title,
                kind,
                category,
                url,
            });
        }
        Ok(items)
    }

    /// Exact PIN-code lookup for the direct-match path.
    pub fn pin_code_info(&self, pincode: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT info FROM pincodes WHERE pincode = ?1")?;
        let mut rows = stmt.query_map(params![pincode], |row| row.get::<_, String>(0))?;
        match rows.next() {
            Some(info) => Ok(Some(info?)),
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Curation CRUD (admin collaborator and sevactl)
    // ------------------------------------------------------------------

    pub fn list_faqs(&self) -> Result<Vec<FaqEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, question, answer FROM faqs ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(FaqEntry {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn add_faq(&self, question: &str, answer: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO faqs (question, answer) VALUES (?1, ?2)",
            params![question, answer],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_faq(&self, id: i64, question: &str, answer: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE faqs SET question = ?1, answer = ?2 WHERE id = ?3",
            params![question, answer, id],
        )?;
        Ok(())
    }

    pub fn list_pin_codes(&self) -> Result<Vec<LocationRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT pincode, info FROM pincodes ORDER BY pincode")?;
        let rows = stmt.query_map([], |row| {
            Ok(LocationRecord {
                pincode: row.get(0)?,
                info: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn add_pin_code(&self, pincode: &str, info: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO pincodes (pincode, info) VALUES (?1, ?2)",
            params![pincode, info],
        )?;
        Ok(())
    }

    pub fn update_pin_code(&self, pincode: &str, info: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE pincodes SET info = ?1 WHERE pincode = ?2",
            params![info, pincode],
        )?;
        Ok(())
    }

    pub fn list_media(&self) -> Result<Vec<MediaItem>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, title, type, category, url FROM media ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (id, title, kind_raw, category, url) = row?;
            let kind = MediaKind::parse(&kind_raw)
                .ok_or_else(|| anyhow!("unknown media type in store: {}", kind_raw))?;
            items.push(MediaItem {
                id,
                title,
                kind,
                category,
                url,
            });
        }
        Ok(items)
    }

    pub fn add_media(&self, title: &str, kind: MediaKind, category: &str, url: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO media (title, type, category, url) VALUES (?1, ?2, ?3, ?4)",
            params![title, kind.as_str(), category, url],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_media(
        &self,
        id: i64,
        title: &str,
        kind: MediaKind,
        category: &str,
        url: &str,
    ) -> Result<()> {
        self.conn().execute(
            "UPDATE media SET title = ?1, type = ?2, category = ?3, url = ?4 WHERE id = ?5",
            params![title, kind.as_str(), category, url, id],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Unanswered-conversation log (engine append, curator review)
    // ------------------------------------------------------------------

    /// Append an unanswered conversation. Called only by the orchestrator.
    pub fn add_unanswered(&self, query: &str, answer: Option<&str>) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO unanswered_conversations (query, answer, timestamp) VALUES (?1, ?2, ?3)",
            params![query, answer, Utc::now()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Newest first, for curator review.
    pub fn list_unanswered(&self) -> Result<Vec<UnansweredConversation>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, query, answer, timestamp FROM unanswered_conversations \
             ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UnansweredConversation {
                id: row.get(0)?,
                query: row.get(1)?,
                answer: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn count_unanswered(&self) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM unanswered_conversations",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_unanswered(&self, id: i64) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM unanswered_conversations WHERE id = ?1",
            params![id],
        )?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store() -> KnowledgeStore {
        let store = KnowledgeStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        store
    }

    #[test]
    fn test_open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("knowledge.db");
        let store = KnowledgeStore::open_at(&path).unwrap();
        store.seed_if_empty().unwrap();
        assert!(path.exists());
        assert_eq!(store.list_faqs().unwrap().len(), SEED_FAQS.len());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = seeded_store();
        store.seed_if_empty().unwrap();
        assert_eq!(store.list_faqs().unwrap().len(), SEED_FAQS.len());
        assert_eq!(store.list_pin_codes().unwrap().len(), SEED_PINCODES.len());
    }

    #[test]
    fn test_faq_search_matches_any_token() {
        let store = seeded_store();
        // "SevaSphere" matches; "zzz" does not; OR semantics still hit
        let results = store.search_faqs("zzz SevaSphere").unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().any(|f| f.question.contains("SevaSphere")));
    }

    #[test]
    fn test_faq_search_is_case_insensitive() {
        let store = seeded_store();
        let results = store.search_faqs("sevasphere").unwrap();
        assert!(!results.is_empty());
    }

    #[test]
    fn test_empty_query_returns_empty_not_error() {
        let store = seeded_store();
        assert!(store.search_faqs("").unwrap().is_empty());
        assert!(store.search_pin_codes("   ").unwrap().is_empty());
        assert!(store.search_media("").unwrap().is_empty());
    }

    #[test]
    fn test_search_is_idempotent() {
        let store = seeded_store();
        let first = store.search_faqs("government services").unwrap();
        let second = store.search_faqs("government services").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pin_code_exact_lookup() {
        let store = seeded_store();
        let info = store.pin_code_info("110001").unwrap();
        assert!(info.unwrap().contains("Connaught Place"));
        assert!(store.pin_code_info("999999").unwrap().is_none());
    }

    #[test]
    fn test_pin_code_search_by_place_name() {
        let store = seeded_store();
        let results = store.search_pin_codes("Kolkata").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].pincode, "700001");
    }

    #[test]
    fn test_media_crud_and_search() {
        let store = seeded_store();
        let id = store
            .add_media(
                "Ration card application walkthrough",
                MediaKind::Video,
                "schemes",
                "https://example.org/v/ration-card",
            )
            .unwrap();

        let results = store.search_media("ration").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
        assert_eq!(results[0].kind, MediaKind::Video);

        store
            .update_media(id, "Ration card guide", MediaKind::Reel, "schemes", "https://example.org/r/1")
            .unwrap();
        let listed = store.list_media().unwrap();
        assert_eq!(listed[0].title, "Ration card guide");
        assert_eq!(listed[0].kind, MediaKind::Reel);
    }

    #[test]
    fn test_faq_crud() {
        let store = KnowledgeStore::open_in_memory().unwrap();
        let id = store.add_faq("How to apply?", "Visit the portal.").unwrap();
        store.update_faq(id, "How to apply?", "Visit the new portal.").unwrap();
        let faqs = store.list_faqs().unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].answer, "Visit the new portal.");
    }

    #[test]
    fn test_unanswered_log_round_trip() {
        let store = KnowledgeStore::open_in_memory().unwrap();
        assert_eq!(store.count_unanswered().unwrap(), 0);

        store.add_unanswered("what is dark matter", Some("best effort")).unwrap();
        let id = store.add_unanswered("PIN code: 999999", None).unwrap();

        let entries = store.list_unanswered().unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].query, "PIN code: 999999");
        assert!(entries[0].answer.is_none());
        assert_eq!(entries[1].answer.as_deref(), Some("best effort"));

        assert!(store.delete_unanswered(id).unwrap());
        assert!(!store.delete_unanswered(id).unwrap());
        assert_eq!(store.count_unanswered().unwrap(), 1);
    }
}
