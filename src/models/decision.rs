use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Reviewer verdict on one resolved diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accept,
    Reject,
}

/// A reviewer decision. Identity is the full triple: two decisions with
/// identical fields are the same decision, which makes re-submission
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: Outcome,
    /// Clean (marker-stripped) literal sentence being decided.
    pub sentence: String,
    /// Clean proposed replacement.
    pub suggestion: String,
}

impl Decision {
    pub fn accept(sentence: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Accept,
            sentence: sentence.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn reject(sentence: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Reject,
            sentence: sentence.into(),
            suggestion: suggestion.into(),
        }
    }
}

/// Append-only ledger of reviewer decisions for one stage.
///
/// The reviewer may revisit and re-click, so `record` never rejects
/// duplicates; `finalize` collapses them by full-tuple identity. A stage is
/// decidable once the finalized count equals its diagnostic count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionLedger {
    entries: Vec<Decision>,
}

impl DecisionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decision unconditionally.
    pub fn record(&mut self, decision: Decision) {
        self.entries.push(decision);
    }

    /// Raw entry count, duplicates included.
    pub(crate) fn raw_len(&self) -> usize {
        self.entries.len()
    }

    /// Deduplicate by full-tuple identity, keeping one entry per unique
    /// (outcome, sentence, suggestion). Order among duplicates is irrelevant
    /// since the fields are identical; first-seen order is preserved.
    pub fn finalize(&self) -> Vec<Decision> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|d| seen.insert((*d).clone()))
            .cloned()
            .collect()
    }

    /// True when every one of `diagnostic_count` diagnostics has exactly one
    /// finalized decision.
    pub fn covers(&self, diagnostic_count: usize) -> bool {
        self.finalize().len() == diagnostic_count
    }

    /// Drop all entries. Called once a stage's mutation has run and ownership
    /// of the outcome has transferred to the produced snapshots.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
