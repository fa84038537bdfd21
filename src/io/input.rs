use std::path::Path;

use anyhow::{Context, Result};

use crate::pipeline::normalize::canonicalize;

/// Load a plain-text review document and canonicalize it.
///
/// Binary word-processor formats are out of scope; callers convert to plain
/// text before handing the document over.
pub fn load_document(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let text = canonicalize(&content);
    if text.is_empty() {
        anyhow::bail!("Document {:?} contains no usable sentences", path);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_document_canonicalizes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "The  method\n\nis weak...\nThe results are clear.").unwrap();

        let text = load_document(file.path()).unwrap();

        assert_eq!(text, "The method is weak. The results are clear.");
    }

    #[test]
    fn test_load_empty_document_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n \n").unwrap();

        assert!(load_document(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_document(Path::new("/nonexistent/review.txt")).is_err());
    }
}
