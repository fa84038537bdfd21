/// Text normalization: collapse a raw extracted document into the canonical
/// sentence-joined form that all later span matching operates against.
///
/// Extracted text tends to carry hard line breaks, blank-line runs, and
/// ragged spacing that confuse sentence matching, so the document is
/// decomposed into sentence units and rebuilt with uniform separators.

/// Sentence terminator characters recognized by the tokenizer.
const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split text into sentence units.
///
/// A unit ends at a run of terminator characters followed by whitespace or
/// end of input. The terminators stay attached to the unit. Units whose
/// trimmed length is under 2 characters are dropped as noise.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if TERMINATORS.contains(&c) {
            // consume the rest of the terminator run
            while let Some(&next) = chars.peek() {
                if TERMINATORS.contains(&next) {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let boundary = chars.peek().is_none_or(|&next| next.is_whitespace());
            if boundary {
                push_unit(&mut sentences, &current);
                current.clear();
            }
        }
    }
    push_unit(&mut sentences, &current);
    sentences
}

fn push_unit(sentences: &mut Vec<String>, unit: &str) {
    let trimmed = unit.trim();
    if trimmed.chars().count() >= 2 {
        sentences.push(trimmed.to_string());
    }
}

/// Collapse any run of two or more periods into exactly one.
pub fn collapse_dots(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_dot = false;
    for c in text.chars() {
        if c == '.' {
            if !prev_dot {
                out.push(c);
            }
            prev_dot = true;
        } else {
            out.push(c);
            prev_dot = false;
        }
    }
    out
}

/// Collapse internal whitespace runs in each unit to a single space.
fn squash_whitespace(unit: &str) -> String {
    unit.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Produce the canonical form of a raw extracted document.
///
/// Sentence units are tokenized, whitespace-squashed, rejoined with a single
/// `". "` separator, and period runs are collapsed. Idempotent: canonical
/// text normalizes to itself.
pub fn canonicalize(text: &str) -> String {
    let units: Vec<String> = split_sentences(text)
        .iter()
        .map(|s| squash_whitespace(s))
        .collect();
    collapse_dots(&units.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_basic() {
        let units = split_sentences("The method is weak. The results are clear.");
        assert_eq!(units, vec!["The method is weak.", "The results are clear."]);
    }

    #[test]
    fn test_split_sentences_drops_noise_units() {
        let units = split_sentences("A. The method is weak. !");
        assert_eq!(units, vec!["A.", "The method is weak."]);
    }

    #[test]
    fn test_split_does_not_break_mid_token() {
        // a period not followed by whitespace is not a boundary
        let units = split_sentences("See section 3.2 for details. Next sentence here.");
        assert_eq!(
            units,
            vec!["See section 3.2 for details.", "Next sentence here."]
        );
    }

    #[test]
    fn test_collapse_dots() {
        assert_eq!(collapse_dots("Good work...."), "Good work.");
        assert_eq!(collapse_dots("A.. B... C."), "A. B. C.");
        assert_eq!(collapse_dots("No change."), "No change.");
    }

    #[test]
    fn test_collapse_dots_idempotent() {
        let once = collapse_dots("Ellipsis... everywhere.....");
        assert_eq!(collapse_dots(&once), once);
    }

    #[test]
    fn test_canonicalize_squashes_formatting() {
        let raw = "The  method\n\nis weak.\n\n\nThe results\tare clear.";
        assert_eq!(
            canonicalize(raw),
            "The method is weak. The results are clear."
        );
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let cases = [
            "The  method\nis weak... The results are clear.",
            "One sentence only.",
            "Strong claim! Is it justified? Perhaps.",
            "",
        ];
        for raw in cases {
            let once = canonicalize(raw);
            assert_eq!(canonicalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_canonicalize_empty() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("   \n\n  "), "");
    }
}
