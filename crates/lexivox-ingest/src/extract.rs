//! Plain-text extraction from statute PDFs.

use std::path::Path;

use lexivox_core::{LexivoxError, Result};
use tracing::info;

/// Extract plain text from a PDF file.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    extract_pdf_text_from_bytes(&bytes, &path.display().to_string())
}

/// Extract plain text from in-memory PDF bytes.
pub fn extract_pdf_text_from_bytes(bytes: &[u8], label: &str) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| LexivoxError::Extract(format!("{}: {}", label, e)))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LexivoxError::Extract(format!(
            "{}: no extractable text",
            label
        )));
    }
    info!(source = %label, chars = trimmed.len(), "Extracted PDF text");
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_bytes_fail_with_extract_error() {
        let err = extract_pdf_text_from_bytes(b"not a pdf", "bogus.pdf").unwrap_err();
        match err {
            LexivoxError::Extract(msg) => assert!(msg.contains("bogus.pdf")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = extract_pdf_text(Path::new("/nonexistent/statute.pdf")).unwrap_err();
        assert!(matches!(err, LexivoxError::Io(_)));
    }
}
