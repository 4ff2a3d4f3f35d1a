//! Page concatenation and offset bookkeeping.

use crate::document::PageContent;

/// Separator joining consecutive page texts in the document buffer.
pub(crate) const PAGE_SEPARATOR: &str = "\n\n";

/// Offsets of one page's text within the concatenated buffer.
/// `end` is exclusive and does not count the trailing separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageSpan {
    pub start: usize,
    pub end: usize,
}

/// The concatenated document buffer plus one span per page.
#[derive(Debug)]
pub(crate) struct PageLayout {
    pub buffer: String,
    pub spans: Vec<PageSpan>,
}

impl PageLayout {
    pub fn assemble(pages: &[PageContent]) -> Self {
        let mut spans = Vec::with_capacity(pages.len());
        let mut cursor = 0usize;

        for (i, page) in pages.iter().enumerate() {
            let start = cursor;
            cursor += page.text.len();
            spans.push(PageSpan { start, end: cursor });
            if i < pages.len() - 1 {
                cursor += PAGE_SEPARATOR.len();
            }
        }

        let buffer = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);

        debug_assert_eq!(buffer.len(), cursor);

        Self { buffer, spans }
    }

    /// A page's span extended to claim its trailing separator, so boundary
    /// characters attribute to the earlier page. The last page has nothing
    /// trailing it.
    pub fn inclusive_end(&self, page_idx: usize) -> usize {
        let span = &self.spans[page_idx];
        if page_idx < self.spans.len() - 1 {
            span.end + PAGE_SEPARATOR.len()
        } else {
            span.end
        }
    }
}
