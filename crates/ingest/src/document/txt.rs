use super::{ExtractionError, PageContent};

pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    // Try UTF-8 first, fall back to lossy conversion
    let text = String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::NoText);
    }

    Ok(vec![PageContent {
        page_number: 1,
        text: trimmed.to_string(),
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let pages = extract_txt(b"Hello, world!\nThis is a test file.").unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("Hello, world!"));
    }

    #[test]
    fn trims_whitespace() {
        let pages = extract_txt(b"  \n  Hello  \n  ").unwrap();
        assert_eq!(pages[0].text, "Hello");
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(extract_txt(b"   \n "), Err(ExtractionError::NoText)));
    }
}
