//! Character-level comment scanner
//!
//! A five-state machine that finds comment ranges without tokenizing:
//!
//! | state | meaning                          |
//! |-------|----------------------------------|
//! | 0     | normal code                      |
//! | 1     | saw `/`                          |
//! | 2     | inside a block comment           |
//! | 3     | saw `*` inside a block comment   |
//! | 4     | inside a line comment            |
//!
//! It knows nothing about string literals, so `"/* not a comment */"` is
//! reported as a comment. Callers that care use [`super::literals`].

/// Inclusive byte range of one comment, delimiters included.
/// Line comments end at their terminating newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRange {
    pub start: usize,
    pub end: usize,
}

impl CommentRange {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Locate comments. With `block_only` the `//` transition is disabled.
/// Comments that never terminate produce no range.
pub fn comment_ranges(code: &str, block_only: bool) -> Vec<CommentRange> {
    let mut ranges = Vec::new();
    let mut state = 0u8;
    let mut start = 0;

    for (i, &c) in code.as_bytes().iter().enumerate() {
        state = match (state, c) {
            (0, b'/') => 1,
            (0, _) => 0,
            (1, b'*') => {
                start = i - 1;
                2
            }
            (1, b'/') if !block_only => {
                start = i - 1;
                4
            }
            (1, _) => 0,
            (2, b'*') => 3,
            (2, _) => 2,
            (3, b'/') => {
                ranges.push(CommentRange { start, end: i });
                0
            }
            (3, b'*') => 3,
            (3, _) => 2,
            (4, b'\n') => {
                ranges.push(CommentRange { start, end: i });
                0
            }
            (s, _) => s,
        };
    }

    ranges
}

/// Drop every byte covered by `ranges` (sorted, non-overlapping)
pub fn remove_ranges(code: &str, ranges: &[CommentRange]) -> String {
    if ranges.is_empty() {
        return code.to_string();
    }

    let bytes = code.as_bytes();
    let mut kept = Vec::with_capacity(bytes.len());
    let mut cursor = 0;
    for range in ranges {
        if range.start >= cursor {
            kept.extend_from_slice(&bytes[cursor..range.start]);
        }
        cursor = cursor.max(range.end + 1);
    }
    if cursor < bytes.len() {
        kept.extend_from_slice(&bytes[cursor..]);
    }

    // Ranges start and end on ASCII delimiters, so the remainder is valid UTF-8
    String::from_utf8_lossy(&kept).into_owned()
}

/// Remove block comments found by the scanner
pub fn remove_block_comments(code: &str) -> String {
    remove_ranges(code, &comment_ranges(code, true))
}
