use bytes::Bytes;

use crate::error::{Error, Result};

/// Extracts the text layer of a PDF. Parsing is CPU bound, so it runs on the
/// blocking pool. A parser panic on a malformed file surfaces as a join error
/// and is reported the same way as a parse error.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| Error::Unprocessable(format!("Failed to read PDF: {}", e)))?
        .map_err(|e| Error::Unprocessable(format!("Failed to read PDF: {}", e)))?;

    let text = normalize_extracted_text(&text);
    if text.is_empty() {
        return Err(Error::Unprocessable("Empty PDF content".to_string()));
    }
    Ok(text)
}

/// Flattens line breaks into spaces and drops commas, leaving single-spaced prose.
pub fn normalize_extracted_text(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ")
        .replace(',', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_layout_noise() {
        let raw = "I feel calm,\nmost of the time.\r\n\n  I  worry a lot";
        assert_eq!(
            normalize_extracted_text(raw),
            "I feel calm most of the time. I worry a lot"
        );
    }

    #[tokio::test]
    async fn garbage_bytes_are_rejected() {
        let err = extract_pdf_text(Bytes::from_static(b"definitely not a pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unprocessable(_)));
    }
}
