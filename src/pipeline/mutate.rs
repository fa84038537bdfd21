use anyhow::Result;

use crate::error::PipelineError;
use crate::models::{mark_span, Decision, Outcome};
use crate::pipeline::normalize::collapse_dots;

/// The two derived documents produced when a stage's decisions are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutput {
    /// Clean text with accepted suggestions substituted in.
    pub applied: String,
    /// Same text with accepted substitutions wrapped in edit markers, so the
    /// next stage knows those spans were already revised.
    pub annotated: String,
}

/// A located, non-overlapping substitution.
#[derive(Debug, Clone)]
struct SpanPatch {
    start: usize,
    end: usize,
    replacement: String,
}

/// Apply a stage's finalized decisions to the base document.
///
/// The caller must have verified decision coverage; `expected_diagnostics`
/// re-checks it here so the mutator refuses to produce a partial document.
///
/// Substitutions are computed as position-sorted span patches against one
/// snapshot of the base text. Longer sentences claim their spans first, so a
/// decided sentence that is a substring of another decided sentence cannot
/// steal the longer sentence's span; repeated whole-string replacement would
/// corrupt exactly that case.
pub fn apply_decisions(
    base: &str,
    decisions: &[Decision],
    expected_diagnostics: usize,
) -> Result<MutationOutput> {
    if decisions.len() != expected_diagnostics {
        return Err(PipelineError::IncompleteDecisions {
            decided: decisions.len(),
            expected: expected_diagnostics,
        }
        .into());
    }

    let accepted: Vec<&Decision> = decisions
        .iter()
        .filter(|d| d.outcome == Outcome::Accept)
        .collect();

    let spans = claim_spans(base, &accepted)?;

    let applied_patches: Vec<SpanPatch> = spans
        .iter()
        .zip(&accepted)
        .map(|((start, end), d)| SpanPatch {
            start: *start,
            end: *end,
            replacement: normalize_trailing_period(&d.suggestion),
        })
        .collect();
    let annotated_patches: Vec<SpanPatch> = spans
        .iter()
        .zip(&accepted)
        .map(|((start, end), d)| SpanPatch {
            start: *start,
            end: *end,
            replacement: mark_span(&normalize_trailing_period(&d.suggestion)),
        })
        .collect();

    Ok(MutationOutput {
        applied: collapse_dots(&splice(base, applied_patches)),
        annotated: splice(base, annotated_patches),
    })
}

/// Locate one literal span per accepted decision, none overlapping.
///
/// Decisions are processed longest-sentence-first; each takes its first
/// occurrence that does not intersect an already-claimed range. Returned
/// spans are in the same order as `accepted`.
fn claim_spans(base: &str, accepted: &[&Decision]) -> Result<Vec<(usize, usize)>> {
    let mut order: Vec<usize> = (0..accepted.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(accepted[i].sentence.len()));

    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut spans = vec![(0usize, 0usize); accepted.len()];

    for i in order {
        let sentence = &accepted[i].sentence;
        let span = find_unclaimed(base, sentence, &claimed)
            .ok_or_else(|| PipelineError::SpanNotFound(sentence.clone()))?;
        claimed.push(span);
        spans[i] = span;
    }
    Ok(spans)
}

/// First occurrence of `needle` in `base` that does not intersect any
/// claimed range.
fn find_unclaimed(base: &str, needle: &str, claimed: &[(usize, usize)]) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(offset) = base[from..].find(needle) {
        let start = from + offset;
        let end = start + needle.len();
        let overlaps = claimed.iter().any(|&(s, e)| start < e && end > s);
        if !overlaps {
            return Some((start, end));
        }
        // step past the occurrence's first char, staying on a utf-8 boundary
        from = start + base[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Build the output by copying untouched ranges and splicing replacements in
/// offset order.
fn splice(base: &str, mut patches: Vec<SpanPatch>) -> String {
    patches.sort_by_key(|p| p.start);

    let mut out = String::with_capacity(base.len());
    let mut cursor = 0;
    for patch in &patches {
        out.push_str(&base[cursor..patch.start]);
        out.push_str(&patch.replacement);
        cursor = patch.end;
    }
    out.push_str(&base[cursor..]);
    out
}

/// Trim any run of trailing periods and end with exactly one.
fn normalize_trailing_period(suggestion: &str) -> String {
    format!("{}.", suggestion.trim_end_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;

    #[test]
    fn test_accept_substitutes_and_annotates() {
        let base = "The method is weak. The results are clear.";
        let decisions = vec![Decision::accept(
            "The method is weak.",
            "The method could be strengthened by adding a robustness check",
        )];

        let out = apply_decisions(base, &decisions, 1).unwrap();

        assert_eq!(
            out.applied,
            "The method could be strengthened by adding a robustness check. The results are clear."
        );
        assert_eq!(
            out.annotated,
            "<<The method could be strengthened by adding a robustness check.>> The results are clear."
        );
    }

    #[test]
    fn test_reject_leaves_text_unchanged() {
        let base = "The method is weak. The results are clear.";
        let decisions = vec![Decision::reject("The method is weak.", "anything")];

        let out = apply_decisions(base, &decisions, 1).unwrap();

        assert_eq!(out.applied, base);
        assert_eq!(out.annotated, base);
    }

    #[test]
    fn test_refuses_incomplete_decisions() {
        let base = "The method is weak.";
        let decisions = vec![Decision::accept("The method is weak.", "s")];

        let err = apply_decisions(base, &decisions, 2).unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(
            err,
            PipelineError::IncompleteDecisions {
                decided: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_substring_sentences_do_not_corrupt_each_other() {
        let base = "We think results are clear and strong. Also results are clear.";
        let decisions = vec![
            Decision::accept("results are clear", "findings are unambiguous"),
            Decision::accept("results are clear and strong", "findings are unambiguous and robust"),
        ];

        let out = apply_decisions(base, &decisions, 2).unwrap();

        assert_eq!(
            out.applied,
            "We think findings are unambiguous and robust. Also findings are unambiguous."
        );
    }

    #[test]
    fn test_overlap_rescan_survives_multibyte_sentences() {
        let base = "Élan vital is strong and pure. Élan vital is strong.";
        let decisions = vec![
            Decision::accept("Élan vital is strong", "The creative force persists"),
            Decision::accept(
                "Élan vital is strong and pure.",
                "The creative force persists in full.",
            ),
        ];

        let out = apply_decisions(base, &decisions, 2).unwrap();

        assert_eq!(
            out.applied,
            "The creative force persists in full. The creative force persists."
        );
    }

    #[test]
    fn test_trailing_periods_normalized() {
        let base = "Good work everyone. More text.";
        let decisions = vec![Decision::accept("Good work everyone.", "Good work....")];

        let out = apply_decisions(base, &decisions, 1).unwrap();

        assert_eq!(out.applied, "Good work. More text.");
        assert_eq!(out.annotated, "<<Good work.>> More text.");
    }

    #[test]
    fn test_missing_sentence_is_an_error() {
        let base = "The method is weak.";
        let decisions = vec![Decision::accept("Not in the document.", "s")];

        let err = apply_decisions(base, &decisions, 1).unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(err, PipelineError::SpanNotFound(_)));
    }

    #[test]
    fn test_repeated_sentence_claims_distinct_spans() {
        let base = "It is fine. It is fine.";
        let decisions = vec![
            Decision::accept("It is fine.", "It is good."),
            Decision::reject("It is fine.", "It is great."),
        ];

        let out = apply_decisions(base, &decisions, 2).unwrap();

        // only the accepted decision patches, taking the first occurrence
        assert_eq!(out.applied, "It is good. It is fine.");
    }
}
