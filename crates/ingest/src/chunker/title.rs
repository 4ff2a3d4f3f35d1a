//! Document title detection.

use std::sync::OnceLock;

use regex::Regex;

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(request for proposal.*|tender.*|rfp.*|bid document.*)")
            .expect("title pattern compiles")
    })
}

/// Detect a document title from the first page's text.
///
/// Looks for a tender lead-in phrase and takes the rest of that line;
/// otherwise the first non-blank line; otherwise the caller's fallback.
pub(crate) fn detect_title(first_page_text: &str, fallback: &str) -> String {
    if let Some(m) = title_re().find(first_page_text) {
        return m.as_str().trim().to_string();
    }

    first_page_text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_lead_in_to_end_of_line() {
        let text = "REQUEST FOR PROPOSAL FOR ROAD CONSTRUCTION\nSection 1...";
        assert_eq!(
            detect_title(text, "Untitled"),
            "REQUEST FOR PROPOSAL FOR ROAD CONSTRUCTION"
        );
    }

    #[test]
    fn match_is_case_insensitive() {
        let text = "Issued by the ministry\nTender for supply of pipes\nMore text";
        assert_eq!(detect_title(text, "Untitled"), "Tender for supply of pipes");
    }

    #[test]
    fn mid_line_match_takes_rest_of_line() {
        let text = "Notice: RFP 2025/17 water treatment\nbody";
        assert_eq!(detect_title(text, "Untitled"), "RFP 2025/17 water treatment");
    }

    #[test]
    fn falls_back_to_first_non_blank_line() {
        let text = "\n  \n  Municipal Works Department  \nmore";
        assert_eq!(detect_title(text, "Untitled"), "Municipal Works Department");
    }

    #[test]
    fn falls_back_to_default_when_blank() {
        assert_eq!(detect_title("  \n \n", "Parsed Tender Document"), "Parsed Tender Document");
    }
}
