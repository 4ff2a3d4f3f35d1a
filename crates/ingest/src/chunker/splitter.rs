//! Recursive character splitting.
//!
//! Splits the document buffer into overlapping chunks using a fixed cascade
//! of separators, preferring paragraph breaks over sentence breaks over word
//! breaks. Pieces are greedily accumulated up to the target chunk size, and
//! overlap is achieved by re-including trailing pieces of the previous chunk
//! rather than re-slicing raw characters. A piece still oversized at a given
//! cascade level is recursed into with the next separator; the final
//! empty-string level degrades to a raw character window.
//!
//! The exact boundary decisions here determine every downstream offset, so
//! the cascade order, the strict `< chunk_size` piece test, and the
//! back-off loop must not be reordered.

use std::collections::VecDeque;

use super::types::ChunkConfig;

/// Separator cascade, highest-level boundary first. The trailing empty
/// string is the hard character split of last resort.
pub(crate) const SEPARATORS: &[&str] = &[
    "\n\n\n", "\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " ", "",
];

/// Split `text` into chunk texts per the separator cascade.
pub(crate) fn split_text(text: &str, config: &ChunkConfig) -> Vec<String> {
    split_recursive(text, SEPARATORS, config)
}

fn split_recursive(text: &str, separators: &[&str], config: &ChunkConfig) -> Vec<String> {
    // Pick the first separator that occurs in the text; the empty string
    // always applies.
    let mut separator: &str = separators.last().copied().unwrap_or("");
    let mut remaining: &[&str] = &[];
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep) {
            separator = sep;
            remaining = &separators[i + 1..];
            break;
        }
    }

    let splits = split_on(text, separator);

    let mut final_chunks = Vec::new();
    let mut good: Vec<&str> = Vec::new();

    for piece in splits {
        if piece.len() < config.chunk_size {
            good.push(piece);
        } else {
            // Flush accumulated pieces before handling the oversized one.
            if !good.is_empty() {
                final_chunks.append(&mut merge_splits(&good, separator, config));
                good.clear();
            }
            if remaining.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.append(&mut split_recursive(piece, remaining, config));
            }
        }
    }
    if !good.is_empty() {
        final_chunks.append(&mut merge_splits(&good, separator, config));
    }

    final_chunks
}

/// Split by `separator`, dropping empty fragments. The empty separator
/// yields one fragment per character (on char boundaries).
fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(separator).filter(|s| !s.is_empty()).collect()
    }
}

/// Greedily accumulate pieces into chunks of at most `chunk_size`
/// characters (separator reinserted between pieces), stepping back
/// `chunk_overlap` characters-worth of trailing pieces between chunks.
fn merge_splits(splits: &[&str], separator: &str, config: &ChunkConfig) -> Vec<String> {
    let sep_len = separator.len();
    let mut docs: Vec<String> = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in splits {
        let piece_len = piece.len();
        let joined_len = total + piece_len + if current.is_empty() { 0 } else { sep_len };

        if joined_len > config.chunk_size {
            if total > config.chunk_size {
                tracing::warn!(
                    size = total,
                    limit = config.chunk_size,
                    "emitted a chunk longer than the configured size"
                );
            }
            if !current.is_empty() {
                docs.push(join_pieces(&current, separator));

                // Drop leading pieces until the carried tail fits the overlap
                // budget and the next piece fits the chunk budget.
                while total > config.chunk_overlap
                    || (total + piece_len + if current.is_empty() { 0 } else { sep_len }
                        > config.chunk_size
                        && total > 0)
                {
                    let Some(first) = current.pop_front() else {
                        break;
                    };
                    total -= first.len() + if current.is_empty() { 0 } else { sep_len };
                }
            }
        }

        current.push_back(piece);
        total += piece_len + if current.len() > 1 { sep_len } else { 0 };
    }

    if !current.is_empty() {
        docs.push(join_pieces(&current, separator));
    }

    docs
}

fn join_pieces(pieces: &VecDeque<&str>, separator: &str) -> String {
    let mut out = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, chunk_overlap: usize) -> ChunkConfig {
        ChunkConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("one\n\ntwo\n\nthree", &config(2500, 400));
        assert_eq!(chunks, vec!["one\n\ntwo\n\nthree".to_string()]);
    }

    #[test]
    fn splits_at_paragraph_boundaries() {
        let text = "aaaa aaaa\n\nbbbb bbbb\n\ncccc cccc";
        let chunks = split_text(text, &config(12, 0));
        // Each paragraph is 9 chars; joining any two would exceed 12.
        assert_eq!(chunks, vec!["aaaa aaaa", "bbbb bbbb", "cccc cccc"]);
    }

    #[test]
    fn accumulates_pieces_up_to_chunk_size() {
        let text = "aa\n\nbb\n\ncc\n\ndd";
        let chunks = split_text(text, &config(10, 0));
        // aa + sep + bb = 6; adding cc would make 10 > 10? 6 + 2 + 2 = 10, not > 10.
        assert_eq!(chunks, vec!["aa\n\nbb\n\ncc", "dd"]);
    }

    #[test]
    fn overlap_reincludes_trailing_pieces() {
        let text = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let chunks = split_text(text, &config(10, 4));
        // First chunk: aaaa + bbbb (10 chars). Back-off keeps bbbb (4 <= 4),
        // so the second chunk starts with it.
        assert_eq!(chunks[0], "aaaa\n\nbbbb");
        assert!(chunks[1].starts_with("bbbb"));
    }

    #[test]
    fn recurses_into_oversized_pieces() {
        // One paragraph far above the limit forces newline, then sentence
        // level splitting.
        let text = "short\n\nThis is a sentence. This is another sentence. And a third one here.";
        let chunks = split_text(text, &config(30, 0));
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.len() <= 30, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn hard_character_split_as_last_resort() {
        let text = "x".repeat(25);
        let chunks = split_text(&text, &config(10, 0));
        assert_eq!(chunks, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
    }

    #[test]
    fn hard_character_split_with_overlap_slides_window() {
        let text = "abcdefghij";
        let chunks = split_text(text, &config(4, 2));
        // Sliding window: 4 chars, stepping 2.
        assert_eq!(chunks[0], "abcd");
        assert_eq!(chunks[1], "cdef");
        assert_eq!(chunks[2], "efgh");
        assert_eq!(chunks[3], "ghij");
    }

    #[test]
    fn consecutive_separators_collapse() {
        // Empty fragments between runs of separators are dropped, so the
        // rejoined chunk normalizes the run down to a single separator.
        let text = "aaaa\n\n\n\n\n\nbbbb";
        let chunks = split_text(text, &config(2500, 400));
        assert_eq!(chunks, vec!["aaaa\n\n\nbbbb".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text("", &config(100, 10)).is_empty());
    }

    #[test]
    fn preserves_whitespace_at_chunk_edges() {
        let text = "line one\nline two\n\nline three";
        let chunks = split_text(text, &config(2500, 400));
        assert_eq!(chunks, vec![text.to_string()]);
    }
}
