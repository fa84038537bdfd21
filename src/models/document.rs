use serde::{Deserialize, Serialize};

use super::Lens;

/// Opening sentinel for a span that has already been revised in an earlier
/// stage. The feedback service is told to treat marked spans carefully, and
/// the aligner strips markers before matching.
pub const MARKER_OPEN: &str = "<<";
/// Closing sentinel, see [`MARKER_OPEN`].
pub const MARKER_CLOSE: &str = ">>";

/// Remove all edit-marker sentinels, recovering literal content.
pub fn strip_markers(text: &str) -> String {
    text.replace(MARKER_OPEN, "").replace(MARKER_CLOSE, "")
}

/// Whether the text carries any edit markers.
pub fn has_markers(text: &str) -> bool {
    text.contains(MARKER_OPEN) || text.contains(MARKER_CLOSE)
}

/// Wrap a span in edit markers.
pub fn mark_span(text: &str) -> String {
    format!("{MARKER_OPEN}{text}{MARKER_CLOSE}")
}

/// An immutable snapshot of the document at a stage boundary.
///
/// Every completed stage holds two: the *applied* snapshot (clean text with
/// accepted suggestions substituted in) and the *annotated* snapshot (same
/// text with accepted substitutions wrapped in markers for the next stage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Stage that produced this snapshot.
    pub lens: Lens,
    /// Full document text.
    pub text: String,
}

impl DocumentSnapshot {
    pub fn new(lens: Lens, text: impl Into<String>) -> Self {
        Self {
            lens,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markers() {
        assert_eq!(strip_markers("<<Fixed.>> Rest."), "Fixed. Rest.");
        assert_eq!(strip_markers("No markers."), "No markers.");
    }

    #[test]
    fn test_mark_span_round_trip() {
        let marked = mark_span("The method is sound.");
        assert!(has_markers(&marked));
        assert_eq!(strip_markers(&marked), "The method is sound.");
    }

    #[test]
    fn test_snapshot_keeps_text_verbatim() {
        let snap = DocumentSnapshot::new(Lens::EndGoal, "<<A.>> B.");
        assert_eq!(snap.text, "<<A.>> B.");
    }
}
