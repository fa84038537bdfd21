use std::collections::{HashMap, HashSet};

use anyhow::Result;
use tracing::{info, warn};

use crate::llm::{flatten_response, validate_response, FeedbackProvider};
use crate::models::{DiagnosticRecord, FeedbackResponse, Lens, ResolvedDiagnostic};
use crate::pipeline::align::{align_diagnostics, AlignConfig};

/// Count sentences claimed by more than one record. Detection runs on the
/// raw reported sentences, before alignment, matching where the duplication
/// is introduced.
pub fn duplicate_sentence_count(records: &[DiagnosticRecord]) -> usize {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert(r.sentence.as_str()))
        .count()
}

/// Reconcile a feedback response into resolved diagnostics.
///
/// The response is contract-checked first, so every provider implementation
/// gets the same boundary validation regardless of what its transport did.
///
/// If any sentence was classified under more than one trait, the service is
/// re-invoked with the disambiguation prompt and the replacement response is
/// validated and aligned instead. Regardless of how that went, the resolved
/// set is deduplicated by (clean sentence, clean suggestion), keeping the
/// last occurrence. The upstream service can legitimately propose the same
/// fix from two trait perspectives; single ownership keeps decision identity
/// simple.
pub async fn resolve_and_align<P: FeedbackProvider>(
    provider: &P,
    lens: Lens,
    document: &str,
    response: &FeedbackResponse,
    config: &AlignConfig,
) -> Result<Vec<ResolvedDiagnostic>> {
    validate_response(response)?;
    let mut records = flatten_response(response);

    let duplicates = duplicate_sentence_count(&records);
    if duplicates > 0 {
        info!(
            %lens,
            duplicates,
            "sentences classified under multiple traits, requesting disambiguation"
        );
        let reassigned = provider.resolve_conflicts(response, lens).await?;
        validate_response(&reassigned)?;
        records = flatten_response(&reassigned);

        let remaining = duplicate_sentence_count(&records);
        if remaining > 0 {
            // last-wins dedup below guarantees progress; the alternate trait
            // framing of the dropped duplicate is lost
            warn!(%lens, remaining, "disambiguation left duplicates, falling back to last-wins");
        }
    }

    let resolved = align_diagnostics(document, &records, config);
    Ok(dedup_last_wins(resolved))
}

/// Keep the last occurrence per (clean sentence, clean suggestion) pair,
/// preserving the order in which survivors first appeared.
pub fn dedup_last_wins(diagnostics: Vec<ResolvedDiagnostic>) -> Vec<ResolvedDiagnostic> {
    let mut last_index: HashMap<(String, String), usize> = HashMap::new();
    for (i, d) in diagnostics.iter().enumerate() {
        last_index.insert((d.clean_sentence(), d.clean_suggestion()), i);
    }

    diagnostics
        .into_iter()
        .enumerate()
        .filter(|(i, d)| last_index[&(d.clean_sentence(), d.clean_suggestion())] == *i)
        .map(|(_, d)| d)
        .collect()
}
