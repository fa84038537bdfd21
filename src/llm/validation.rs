use crate::error::PipelineError;
use crate::models::{DiagnosticRecord, FeedbackResponse};

/// Validate a feedback response at the boundary.
///
/// The service contract requires the two list fields of every entry to be
/// positionally aligned and equal length, and sentences/suggestions to be
/// non-empty. Misaligned or degenerate responses never enter the pipeline.
pub fn validate_response(response: &FeedbackResponse) -> Result<(), PipelineError> {
    for (i, entry) in response.improvements.iter().enumerate() {
        if entry.trait_name.trim().is_empty() {
            return Err(PipelineError::SchemaViolation(format!(
                "entry {i} has an empty trait label"
            )));
        }
        let sentences = entry.sentences_needing_improvement.len();
        let suggestions = entry.suggested_improvement.len();
        if sentences != suggestions {
            return Err(PipelineError::SchemaViolation(format!(
                "entry {i} ({}) has {sentences} sentences but {suggestions} suggestions",
                entry.trait_name
            )));
        }
        for (j, sentence) in entry.sentences_needing_improvement.iter().enumerate() {
            if sentence.trim().is_empty() {
                return Err(PipelineError::SchemaViolation(format!(
                    "entry {i} ({}) sentence {j} is empty",
                    entry.trait_name
                )));
            }
        }
    }
    Ok(())
}

/// Flatten a validated response into per-sentence diagnostic records,
/// pairing sentence `i` with suggestion `i` of each entry.
pub fn flatten_response(response: &FeedbackResponse) -> Vec<DiagnosticRecord> {
    response
        .improvements
        .iter()
        .flat_map(|entry| {
            entry
                .sentences_needing_improvement
                .iter()
                .zip(entry.suggested_improvement.iter())
                .map(|(sentence, suggestion)| DiagnosticRecord {
                    trait_name: entry.trait_name.clone(),
                    comment: entry.comment.clone(),
                    sentence: sentence.clone(),
                    suggestion: suggestion.clone(),
                })
        })
        .collect()
}
