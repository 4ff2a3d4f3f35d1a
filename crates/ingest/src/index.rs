//! Table-of-contents extraction.
//!
//! Scans the leading pages of a document for an index/contents page and
//! parses `description .. start[-end]` entries from it. Tender documents
//! rarely carry machine-readable outlines, so this is a best-effort text
//! heuristic: an empty result is valid and downstream chunking simply
//! produces empty section descriptions.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::PageContent;

/// How many leading pages to scan for an index page.
const INDEX_SCAN_PAGES: usize = 15;

/// Page numbers above this are assumed to be parser noise, not real entries.
const MAX_PLAUSIBLE_PAGE: usize = 1000;

/// A coarse table-of-contents entry mapping a page range to a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSection {
    pub description: String,
    /// First page of the section (1-based, as printed in the document).
    pub start: usize,
    /// Last page of the section. Equals `start` for single-page entries.
    pub end: usize,
}

fn index_page_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(contents?|index|table\s+of\s+contents?)\b")
            .expect("index page pattern compiles")
    })
}

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Optional serial number, description starting with a capital,
        // start page, optional "- end" page.
        Regex::new(r"(?:\d+\s+)?([A-Z][^\n\d]{5,}?)\s+(\d{1,3})(?:\s*-\s*(\d{1,3}))?")
            .expect("index entry pattern compiles")
    })
}

fn annex_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(Annex(?:ure)?|Appendix|Enclosure|Supplement)\s*[-:]?\s*([IVX\d]*)\s*[-:]?\s*")
            .expect("annex prefix pattern compiles")
    })
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern compiles"))
}

/// Extract index sections from a document's pages.
///
/// Returns entries sorted by start page. An empty vec means no index page
/// was found or no entries could be parsed from it.
pub fn extract_index_sections(pages: &[PageContent]) -> Vec<IndexSection> {
    let Some(index_page) = pages
        .iter()
        .take(INDEX_SCAN_PAGES)
        .find(|p| index_page_re().is_match(&p.text))
    else {
        tracing::debug!(
            scanned = pages.len().min(INDEX_SCAN_PAGES),
            "no index page found in leading pages"
        );
        return Vec::new();
    };

    tracing::debug!(page = index_page.page_number, "found index page");

    // Normalize horizontal whitespace and collapse blank lines before matching.
    let cleaned = normalize_index_text(&index_page.text);

    let mut sections: Vec<IndexSection> = entry_re()
        .captures_iter(&cleaned)
        .filter_map(|caps| {
            let start: usize = caps.get(2)?.as_str().parse().ok()?;
            if start == 0 || start > MAX_PLAUSIBLE_PAGE {
                return None;
            }
            let end = caps
                .get(3)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(start);

            let description = clean_description(caps.get(1)?.as_str());
            if description.len() < 3 {
                return None;
            }

            Some(IndexSection { description, start, end })
        })
        .collect();

    sections.sort_by_key(|s| s.start);

    if sections.is_empty() {
        tracing::warn!("index page matched but no entries could be parsed");
    } else {
        tracing::info!(entries = sections.len(), "extracted index sections");
    }
    sections
}

fn normalize_index_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let collapsed = line
            .split([' ', '\t'])
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        cleaned.push_str(&collapsed);
        cleaned.push('\n');
    }
    cleaned
}

fn clean_description(raw: &str) -> String {
    let collapsed = whitespace_re().replace_all(raw.trim(), " ").into_owned();
    annex_prefix_re()
        .replace(&collapsed, "$1 $2: ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(num: usize, text: &str) -> PageContent {
        PageContent {
            page_number: num,
            text: text.to_string(),
        }
    }

    #[test]
    fn parses_table_with_ranges() {
        let pages = vec![
            page(1, "REQUEST FOR PROPOSAL\nRoad construction works"),
            page(
                2,
                "TABLE OF CONTENTS\n1 Invitation To Bid 3\n2 Instructions To Bidders 4-16\n3 General Conditions 17-42\n",
            ),
        ];
        let sections = extract_index_sections(&pages);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].description, "Invitation To Bid");
        assert_eq!(sections[0].start, 3);
        assert_eq!(sections[0].end, 3);
        assert_eq!(sections[1].start, 4);
        assert_eq!(sections[1].end, 16);
        assert_eq!(sections[2].end, 42);
    }

    #[test]
    fn sorts_by_start_page() {
        let pages = vec![page(
            1,
            "Contents\nAnnexure II Price Schedule 40-45\nScope Of Work 5-12\n",
        )];
        let sections = extract_index_sections(&pages);
        assert_eq!(sections.len(), 2);
        assert!(sections[0].start <= sections[1].start);
        assert_eq!(sections[0].start, 5);
    }

    #[test]
    fn normalizes_annex_prefix() {
        let pages = vec![page(1, "Index\nAnnexure III Technical Specifications 50-80\n")];
        let sections = extract_index_sections(&pages);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].description.starts_with("Annexure III:"));
    }

    #[test]
    fn no_index_page_yields_empty() {
        let pages = vec![page(1, "Just some body text with no outline markers.")];
        assert!(extract_index_sections(&pages).is_empty());
    }

    #[test]
    fn only_scans_leading_pages() {
        let mut pages: Vec<PageContent> =
            (1..=20).map(|n| page(n, "plain body text here")).collect();
        pages.push(page(21, "Table of Contents\nScope Of Work 5-12\n"));
        assert!(extract_index_sections(&pages).is_empty());
    }

    #[test]
    fn rejects_zero_page_entries() {
        let pages = vec![page(1, "Contents\nSome Stray Entry 0\n")];
        assert!(extract_index_sections(&pages).is_empty());
    }

    #[test]
    fn missing_end_page_defaults_to_start() {
        let pages = vec![page(1, "Contents\nInvitation To Bid 7\n")];
        let sections = extract_index_sections(&pages);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start, 7);
        assert_eq!(sections[0].end, 7);
    }
}
