//! Character-window text chunking.
//!
//! Splits document text into overlapping chunks bounded by a maximum
//! character count. Split points prefer a paragraph break, then a line
//! break, then a space, falling back to a hard cut. The overlap carries
//! trailing context into the next chunk so that sentences spanning a
//! boundary remain retrievable.

/// Split `text` into chunks of at most `chunk_size` characters with
/// `overlap` characters carried over between consecutive chunks.
///
/// Returns an empty vector for blank input. Operates on character counts,
/// never byte offsets, so multi-byte text is split safely.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size - 1);

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= chunk_size {
        return vec![trimmed.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end < chars.len() {
            find_break(&chars, start, hard_end)
        } else {
            hard_end
        };

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        if end >= chars.len() {
            break;
        }
        // Step forward, re-reading `overlap` chars; always make progress.
        start = end.saturating_sub(overlap).max(start + 1);
    }

    chunks
}

/// Find the best split point in `chars[start..hard_end]`.
///
/// Prefers the last paragraph break, then line break, then space, but never
/// earlier than halfway through the window (a split that close to the start
/// would produce degenerate slivers).
fn find_break(chars: &[char], start: usize, hard_end: usize) -> usize {
    let floor = start + (hard_end - start) / 2;

    let mut last_newline = None;
    let mut last_space = None;
    let mut i = hard_end;
    while i > floor {
        i -= 1;
        match chars[i] {
            '\n' => {
                // Paragraph break wins immediately.
                if i > 0 && chars[i - 1] == '\n' {
                    return i + 1;
                }
                if last_newline.is_none() {
                    last_newline = Some(i + 1);
                }
            }
            c if c.is_whitespace() => {
                if last_space.is_none() {
                    last_space = Some(i + 1);
                }
            }
            _ => {}
        }
    }

    last_newline.or(last_space).unwrap_or(hard_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(split_text("", 500, 50).is_empty());
        assert!(split_text("   \n\t  ", 500, 50).is_empty());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("Section 302: Punishment of qatl-i-amd.", 500, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], "Section 302: Punishment of qatl-i-amd.");
    }

    #[test]
    fn test_long_text_respects_chunk_size() {
        let text = "word ".repeat(400);
        let chunks = split_text(&text, 100, 10);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn test_overlap_carries_context() {
        let text = "alpha ".repeat(100);
        let chunks = split_text(&text, 60, 12);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(5).collect::<String>()
                .chars().rev().collect();
            assert!(
                pair[1].contains(tail.trim()),
                "no overlap between {:?} and {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let para1 = "a".repeat(60);
        let para2 = "b".repeat(60);
        let text = format!("{}\n\n{}", para1, para2);
        let chunks = split_text(&text, 100, 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], para1);
        assert_eq!(chunks[1], para2);
    }

    #[test]
    fn test_hard_split_without_whitespace() {
        let text = "x".repeat(250);
        let chunks = split_text(&text, 100, 0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_multibyte_text_no_panic() {
        let text = "ذخیرہ الفاظ قانونی متن ".repeat(80);
        let chunks = split_text(&text, 120, 20);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 120);
        }
    }

    #[test]
    fn test_all_text_is_covered() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(30);
        let chunks = split_text(&text, 80, 0);
        let rejoined: String = chunks.join(" ");
        // With zero overlap, every word must appear in order.
        for word in ["quick", "brown", "jumps", "lazy"] {
            assert!(rejoined.contains(word));
        }
    }

    #[test]
    fn test_overlap_larger_than_chunk_is_clamped() {
        let text = "word ".repeat(100);
        // overlap >= chunk_size would never advance; must be clamped.
        let chunks = split_text(&text, 50, 50);
        assert!(chunks.len() > 1);
        assert!(chunks.len() < 1000, "splitter failed to make progress");
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let chunks = split_text("ab", 0, 0);
        assert_eq!(chunks, vec!["a".to_string(), "b".to_string()]);
    }
}
