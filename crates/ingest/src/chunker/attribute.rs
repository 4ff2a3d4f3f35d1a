//! Chunk attribution: buffer offsets, page numbers, section descriptions.

use super::layout::PageLayout;
use crate::index::IndexSection;

/// Locate a chunk's text in the buffer by literal forward search from
/// `cursor`. Returns the start offset and whether the text was actually
/// found; on a miss the cursor itself is the best-effort position.
///
/// Misses happen when the splitter collapsed a separator run, so the
/// rejoined chunk text no longer equals any buffer substring. They are
/// tolerated, not fatal: attribution degrades to an approximation.
pub(crate) fn locate_chunk(buffer: &str, chunk_text: &str, cursor: usize) -> (usize, bool) {
    match buffer.get(cursor..).and_then(|tail| tail.find(chunk_text)) {
        Some(rel) => (cursor + rel, true),
        None => (cursor, false),
    }
}

/// Attribute a `[char_start, char_end)` span to the 1-based page sharing
/// the most characters with it. Non-last pages claim their trailing
/// separator; ties go to the lowest page index. Defaults to page 1 when
/// nothing overlaps (a span that ran past the buffer end).
pub(crate) fn page_for_span(layout: &PageLayout, char_start: usize, char_end: usize) -> usize {
    let mut best: Option<(usize, usize)> = None;

    for idx in 0..layout.spans.len() {
        let page_start = layout.spans[idx].start;
        let page_end = layout.inclusive_end(idx);

        let lo = char_start.max(page_start);
        let hi = char_end.min(page_end);
        if hi <= lo {
            continue;
        }
        let overlap = hi - lo;
        if best.map_or(true, |(_, b)| overlap > b) {
            best = Some((idx, overlap));
        }
    }

    match best {
        Some((idx, _)) => idx + 1,
        None => {
            tracing::debug!(char_start, char_end, "span overlaps no page, defaulting to page 1");
            1
        }
    }
}

/// Resolve a page number to a section description via a four-tier
/// fallback. Returns an empty string only when `sections` is empty.
///
/// `sections` must be sorted by `start` ascending.
pub(crate) fn section_for_page(sections: &[IndexSection], page_number: usize) -> String {
    if sections.is_empty() {
        return String::new();
    }

    // Tier 1: direct containment.
    if let Some(section) = sections
        .iter()
        .find(|s| s.start <= page_number && page_number <= s.end)
    {
        return section.description.clone();
    }

    // Tier 2: most recent preceding section start.
    if let Some(section) = sections
        .iter()
        .filter(|s| s.start <= page_number)
        .max_by_key(|s| s.start)
    {
        return section.description.clone();
    }

    // Tier 3: page precedes every section.
    let first = &sections[0];
    if page_number < first.start {
        return first.description.clone();
    }

    // Tier 4: page follows every section.
    let last = &sections[sections.len() - 1];
    if page_number > last.end {
        return last.description.clone();
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageContent;

    fn layout(texts: &[&str]) -> PageLayout {
        let pages: Vec<PageContent> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageContent {
                page_number: i + 1,
                text: t.to_string(),
            })
            .collect();
        PageLayout::assemble(&pages)
    }

    fn section(description: &str, start: usize, end: usize) -> IndexSection {
        IndexSection {
            description: description.to_string(),
            start,
            end,
        }
    }

    // ── locate_chunk ────────────────────────────────────────────────

    #[test]
    fn locates_text_forward_of_cursor() {
        let buffer = "alpha beta alpha gamma";
        assert_eq!(locate_chunk(buffer, "alpha", 0), (0, true));
        // Duplicate text: search resumes past the first occurrence.
        assert_eq!(locate_chunk(buffer, "alpha", 5), (11, true));
    }

    #[test]
    fn miss_falls_back_to_cursor() {
        let buffer = "alpha beta";
        assert_eq!(locate_chunk(buffer, "missing", 4), (4, false));
    }

    #[test]
    fn cursor_past_buffer_end_is_a_miss() {
        let buffer = "short";
        assert_eq!(locate_chunk(buffer, "short", 99), (99, false));
    }

    // ── page_for_span ───────────────────────────────────────────────

    #[test]
    fn picks_page_with_greatest_overlap() {
        // Pages: [0,5) [7,10) [12,14); chunk covers everything.
        let l = layout(&["abcde", "fgh", "ij"]);
        // Overlaps (inclusive ends): 7, 5, 2 -> page 1.
        assert_eq!(page_for_span(&l, 0, 14), 1);
        // A span inside page 2 only.
        assert_eq!(page_for_span(&l, 7, 10), 2);
    }

    #[test]
    fn separator_chars_attribute_to_earlier_page() {
        let l = layout(&["ab", "cd"]);
        // Span [2,4) is exactly the separator; page 1's inclusive end is 4.
        assert_eq!(page_for_span(&l, 2, 4), 1);
    }

    #[test]
    fn tie_breaks_to_lowest_page() {
        // Span [0,8): page 1 overlaps 4 (text + separator), page 2 overlaps
        // 4 as well. The earlier page wins the tie.
        let l = layout(&["ab", "cdef"]);
        assert_eq!(page_for_span(&l, 0, 8), 1);
    }

    #[test]
    fn span_beyond_buffer_defaults_to_page_one() {
        let l = layout(&["ab", "cd"]);
        assert_eq!(page_for_span(&l, 50, 60), 1);
    }

    // ── section_for_page ────────────────────────────────────────────

    #[test]
    fn direct_containment_wins() {
        let sections = vec![section("Intro", 1, 3), section("Annex", 4, 10)];
        assert_eq!(section_for_page(&sections, 2), "Intro");
        assert_eq!(section_for_page(&sections, 4), "Annex");
    }

    #[test]
    fn gap_falls_back_to_closest_preceding() {
        let sections = vec![section("Intro", 1, 3), section("Annex", 8, 10)];
        assert_eq!(section_for_page(&sections, 5), "Intro");
    }

    #[test]
    fn page_before_all_sections_uses_first() {
        let sections = vec![section("Scope", 5, 9)];
        assert_eq!(section_for_page(&sections, 2), "Scope");
    }

    #[test]
    fn page_after_all_sections_uses_last() {
        let sections = vec![section("Intro", 1, 3), section("Annex", 4, 10)];
        assert_eq!(section_for_page(&sections, 15), "Annex");
    }

    #[test]
    fn no_sections_yields_empty() {
        assert_eq!(section_for_page(&[], 3), "");
    }

    #[test]
    fn any_page_gets_a_description_when_sections_exist() {
        let sections = vec![section("Intro", 2, 4), section("Annex", 6, 9)];
        for page in 1..=20 {
            assert!(
                !section_for_page(&sections, page).is_empty(),
                "page {page} got no description"
            );
        }
    }
}
