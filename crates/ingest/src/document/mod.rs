mod pdf;
mod txt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("No text could be extracted from the document")]
    NoText,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For TXT, always 1.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "txt"
    pub file_type: String,
    /// Extracted pages in reading order.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated with the page separator the chunker uses.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.len()).sum()
    }
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let file_type = ext.as_str();

    let pages = match file_type {
        "pdf" => pdf::extract_pdf(bytes)?,
        "txt" | "text" => txt::extract_txt(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    if pages.is_empty() {
        return Err(ExtractionError::NoText);
    }

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_extension() {
        let err = extract_text(b"binary", "slides.pptx").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "pptx"));
    }

    #[test]
    fn full_text_joins_pages_with_separator() {
        let doc = ExtractedDocument {
            filename: "t.pdf".to_string(),
            file_type: "pdf".to_string(),
            pages: vec![
                PageContent { page_number: 1, text: "one".to_string() },
                PageContent { page_number: 2, text: "two".to_string() },
            ],
        };
        assert_eq!(doc.full_text(), "one\n\ntwo");
        assert_eq!(doc.total_chars(), 6);
    }
}
