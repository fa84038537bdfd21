use similar::TextDiff;
use tracing::warn;

use crate::models::{has_markers, strip_markers, DiagnosticRecord, ResolvedDiagnostic};
use crate::pipeline::normalize::split_sentences;

/// Configuration for sentence alignment
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Matches scoring below this are flagged (and logged) as low-confidence.
    /// No hard reject: the pipeline prefers surfacing a best-effort match
    /// over silently dropping feedback.
    pub low_confidence_threshold: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            low_confidence_threshold: 0.90,
        }
    }
}

/// Map service-reported sentences onto literal document sentences.
///
/// The service paraphrases rather than quotes, and sentences from later
/// stages may arrive wrapped in edit markers, so each record's sentence is
/// matched against the marker-stripped candidate pool by partial similarity.
/// The winner is always a literal substring of the (clean) document.
pub fn align_diagnostics(
    document: &str,
    records: &[DiagnosticRecord],
    config: &AlignConfig,
) -> Vec<ResolvedDiagnostic> {
    let clean;
    let document = if has_markers(document) {
        clean = strip_markers(document);
        clean.as_str()
    } else {
        document
    };
    let candidates = split_sentences(document);

    records
        .iter()
        .filter_map(|record| align_one(record, &candidates, config))
        .collect()
}

fn align_one(
    record: &DiagnosticRecord,
    candidates: &[String],
    config: &AlignConfig,
) -> Option<ResolvedDiagnostic> {
    let (best, score) = best_match(&record.sentence, candidates)?;

    let low_confidence = score < config.low_confidence_threshold;
    if low_confidence {
        warn!(
            score,
            reported = %record.sentence,
            matched = %best,
            "low-confidence sentence alignment"
        );
    }

    Some(ResolvedDiagnostic {
        trait_name: record.trait_name.clone(),
        comment: record.comment.clone(),
        sentence: best.to_string(),
        suggestion: record.suggestion.clone(),
        score,
        low_confidence,
    })
}

/// Pick the candidate maximizing partial similarity; first-best on ties.
fn best_match<'a>(needle: &str, candidates: &'a [String]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = partial_ratio(needle, candidate);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best
}

/// Substring-tolerant similarity of two strings, 0.0 - 1.0.
///
/// The shorter string is slid across char windows of the longer one; the
/// result is the best window's diff ratio. This tolerates a reported
/// sentence that quotes only part of a document sentence (or vice versa).
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let short_len = short.chars().count();
    if short_len == 0 {
        return if long.is_empty() { 1.0 } else { 0.0 };
    }

    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let ratio = TextDiff::from_chars(short, window.as_str()).ratio() as f64;
        if ratio > best {
            best = ratio;
        }
        if best >= 1.0 {
            break;
        }
    }
    best
}

/// Excerpt of the document around a sentence, for display surfaces: up to
/// 100 chars before and 200 after, with ellipsis fences. Falls back to the
/// whole text when the sentence is absent.
pub fn excerpt_around(text: &str, sentence: &str) -> String {
    let Some(start) = text.find(sentence) else {
        return text.to_string();
    };
    let end = start + sentence.len();

    let before_start = text[..start]
        .char_indices()
        .rev()
        .take(100)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let after_end = text[end..]
        .char_indices()
        .take(200)
        .last()
        .map(|(i, c)| end + i + c.len_utf8())
        .unwrap_or(end);

    format!("....{}....", &text[before_start..after_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sentence: &str, suggestion: &str) -> DiagnosticRecord {
        DiagnosticRecord {
            trait_name: "T".to_string(),
            comment: "c".to_string(),
            sentence: sentence.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    #[test]
    fn test_partial_ratio_exact() {
        assert_eq!(partial_ratio("abc", "abc"), 1.0);
    }

    #[test]
    fn test_partial_ratio_substring() {
        // an exact substring scores 1.0 regardless of the longer text
        assert_eq!(
            partial_ratio("results are clear", "The results are clear."),
            1.0
        );
    }

    #[test]
    fn test_partial_ratio_empty() {
        assert_eq!(partial_ratio("", ""), 1.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_align_paraphrased_sentence() {
        let document = "The method is weak. The results are clear.";
        let records = vec![record("the method is weak", "The method could be strengthened.")];

        let resolved = align_diagnostics(document, &records, &AlignConfig::default());

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].sentence, "The method is weak.");
        assert!(document.contains(&resolved[0].sentence));
    }

    #[test]
    fn test_alignment_literalness() {
        let document = "The sample size is small. The framing is dated. The prose is dense.";
        let records = vec![
            record("sample size seems small", "s1"),
            record("The framing is somewhat dated.", "s2"),
            record("prose is dense", "s3"),
        ];

        let clean = strip_markers(document);
        for resolved in align_diagnostics(document, &records, &AlignConfig::default()) {
            assert!(
                clean.contains(&resolved.sentence),
                "{:?} is not literal",
                resolved.sentence
            );
        }
    }

    #[test]
    fn test_align_strips_markers_from_document() {
        let document = "<<The method is now sound.>> The results are clear.";
        let records = vec![record("The method is now sound.", "s")];

        let resolved = align_diagnostics(document, &records, &AlignConfig::default());

        assert_eq!(resolved[0].sentence, "The method is now sound.");
        assert!(!resolved[0].sentence.contains("<<"));
    }

    #[test]
    fn test_low_confidence_flagged() {
        let document = "The method is weak. The results are clear.";
        let records = vec![record("completely unrelated claim about giraffes", "s")];

        let resolved = align_diagnostics(document, &records, &AlignConfig::default());

        // best-effort match is still returned, but flagged
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].low_confidence);
        assert!(resolved[0].score < 0.90);
    }

    #[test]
    fn test_excerpt_around() {
        let text = "A".repeat(300) + "The focal sentence." + &"B".repeat(300);
        let excerpt = excerpt_around(&text, "The focal sentence.");
        assert!(excerpt.starts_with("...."));
        assert!(excerpt.ends_with("...."));
        assert!(excerpt.contains("The focal sentence."));
        // 100 before + sentence + 200 after + fences
        assert!(excerpt.len() < text.len());
    }

    #[test]
    fn test_excerpt_around_missing_sentence() {
        assert_eq!(excerpt_around("Short text.", "absent"), "Short text.");
    }
}
