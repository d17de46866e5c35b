//! Quality gate for candidate answers.
//!
//! Cheap heuristics only: too-short answers, single-token answers and
//! refusal phrasing are treated as insufficient, which sends the
//! cascade on to the general fallback. Thresholds are configuration,
//! not semantics.

use seva_common::config::QualityConfig;

/// Why the gate rejected a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort { len: usize, min: usize },
    SingleToken,
    Refusal { phrase: String },
}

/// Heuristic answer-quality gate.
pub struct QualityGate {
    min_answer_len: usize,
    refusal_phrases: Vec<String>,
}

impl QualityGate {
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            min_answer_len: config.min_answer_len,
            refusal_phrases: config
                .refusal_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
        }
    }

    /// Evaluate a candidate answer. `Ok(())` means it may be returned
    /// to the user as-is.
    pub fn check(&self, answer: &str) -> Result<(), Rejection> {
        let trimmed = answer.trim();

        if trimmed.chars().count() < self.min_answer_len {
            return Err(Rejection::TooShort {
                len: trimmed.chars().count(),
                min: self.min_answer_len,
            });
        }

        if trimmed.split_whitespace().count() < 2 {
            return Err(Rejection::SingleToken);
        }

        let lower = trimmed.to_lowercase();
        for phrase in &self.refusal_phrases {
            if lower.contains(phrase) {
                return Err(Rejection::Refusal {
                    phrase: phrase.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn passes(&self, answer: &str) -> bool {
        self.check(answer).is_ok()
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self::new(&QualityConfig::default())
    }
}
