use serde::{Deserialize, Serialize};

use super::document::strip_markers;

/// Raw response shape from the feedback service.
///
/// The two list fields of each entry are positionally aligned: sentence `i`
/// pairs with suggestion `i`. Anything that does not match this shape is
/// rejected at the boundary (`llm::validation`) before entering the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub improvements: Vec<FeedbackEntry>,
}

/// One trait's worth of feedback from the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackEntry {
    /// Trait label within the active lens.
    #[serde(rename = "trait")]
    pub trait_name: String,
    /// Free-text rationale for the flagged sentences.
    pub comment: String,
    /// Sentences the service claims need improvement (possibly paraphrased).
    pub sentences_needing_improvement: Vec<String>,
    /// Proposed replacement for each flagged sentence, same order.
    pub suggested_improvement: Vec<String>,
}

/// A single (trait, comment, sentence, suggestion) record, flattened from a
/// [`FeedbackEntry`]. The sentence may be paraphrased or wrapped in edit
/// markers; it is not yet trustworthy for substring operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub trait_name: String,
    pub comment: String,
    pub sentence: String,
    pub suggestion: String,
}

/// A diagnostic after sentence alignment.
///
/// `sentence` is the literal matched substring of the applied document at the
/// time of resolution. Clean views have edit markers stripped and are the
/// fields decisions are keyed on.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDiagnostic {
    pub trait_name: String,
    pub comment: String,
    /// Literal document sentence the record was matched to.
    pub sentence: String,
    /// Proposed replacement, as returned by the service.
    pub suggestion: String,
    /// Similarity score of the match (0.0 - 1.0).
    pub score: f64,
    /// True when the score fell below the high-confidence threshold.
    pub low_confidence: bool,
}

impl ResolvedDiagnostic {
    /// Matched sentence with edit markers stripped.
    pub fn clean_sentence(&self) -> String {
        strip_markers(&self.sentence)
    }

    /// Suggestion with edit markers stripped.
    pub fn clean_suggestion(&self) -> String {
        strip_markers(&self.suggestion)
    }
}
