//! Split a snippet into its code body and the text of its comments
//!
//! Candidates come from two regex passes, block comments first and then line
//! comments, each processed longest match first. A candidate is accepted when
//! its delimiters are intact, it is not sitting inside a parenthesized argument
//! list, and it is not inside a string or char literal. Every processed
//! candidate is blanked in the working buffer so padding and delimiters cannot be
//! matched twice.

use super::literals::is_inside_literal;
use crate::error::ScanError;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Reverse;

lazy_static! {
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)/\*(.*?)\*/").unwrap();
    static ref LINE_COMMENT: Regex = Regex::new(r"//(.+?)(?:\r?\n|$)").unwrap();
}

const BLOCK_TRIM: &[char] = &['/', '*', ' ', '\n'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyComment {
    /// The snippet with accepted comments replaced by spaces; offsets are unchanged
    pub body: String,
    /// Accepted comment texts, most recently accepted first, each followed by `\n`
    pub comments: String,
}

/// Inclusive span of an accepted comment in the snippet
#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

pub fn extract(code: &str) -> Result<BodyComment, ScanError> {
    let mut accepted_spans = Vec::new();
    let mut accepted_text = Vec::new();

    let mut work = code.as_bytes().to_vec();
    let mut blocks: Vec<(usize, usize)> = BLOCK_COMMENT
        .captures_iter(code)
        .filter_map(|c| c.get(1))
        .map(|m| (m.start(), m.end()))
        .collect();
    blocks.sort_by_key(|&(start, end)| Reverse(end - start));

    for (inner_start, inner_end) in blocks {
        let mut left = inner_start - 1;
        while left > 0 && is_padding(work[left]) {
            left -= 1;
        }
        let mut right = inner_end;
        while right < work.len() && is_padding(work[right]) {
            right += 1;
        }

        let delimited = right < work.len() && work[right] == b'/' && work[left] == b'/';
        if !delimited {
            let from = if is_padding(work[left]) { left } else { left + 1 };
            blank(&mut work, from, right);
            continue;
        }

        let span = Span { start: left, end: right };
        if !inside_parentheses(&work, span.start) && !is_inside_literal(code, span.start)? {
            accepted_text.push(code[span.start..=span.end].trim_matches(BLOCK_TRIM).to_string());
            accepted_spans.push(span);
        }
        blank(&mut work, span.start, span.end + 1);
    }

    // Line comments are matched on the untouched snippet, so `//` inside a block comment counts too
    let mut work = code.as_bytes().to_vec();
    let mut lines: Vec<(usize, usize)> = LINE_COMMENT
        .captures_iter(code)
        .filter_map(|c| c.get(1))
        .map(|m| (m.start(), m.end()))
        .collect();
    lines.sort_by_key(|&(start, end)| Reverse(end - start));

    for (content_start, content_end) in lines {
        let mut left = content_start - 1;
        while left > 0 && work[left] == b' ' {
            left -= 1;
        }

        let delimited = left >= 1 && work[left] == b'/' && work[left - 1] == b'/';
        if !delimited {
            blank(&mut work, left + 1, content_end);
            continue;
        }

        let span = Span {
            start: left - 1,
            end: content_end - 1,
        };
        if !inside_parentheses(&work, span.start) && !is_inside_literal(code, span.start)? {
            accepted_text.push(code[content_start..content_end].to_string());
            accepted_spans.push(span);
        }
        blank(&mut work, span.start, span.end + 1);
    }

    let mut body = code.as_bytes().to_vec();
    for span in &accepted_spans {
        blank(&mut body, span.start, span.end + 1);
    }

    let comments = accepted_text
        .iter()
        .rev()
        .fold(String::new(), |mut acc, text| {
            acc.push_str(text);
            acc.push('\n');
            acc
        });

    Ok(BodyComment {
        // Blanked spans start and end on ASCII delimiters
        body: String::from_utf8_lossy(&body).into_owned(),
        comments,
    })
}

/// Comment corpus of `code`, see [`extract`]
pub fn comment_corpus(code: &str) -> Result<String, ScanError> {
    Ok(extract(code)?.comments)
}

fn is_padding(b: u8) -> bool {
    b == b' ' || b == b'*'
}

/// Replace `buf[from..to]` with spaces, keeping multi-byte characters aligned
fn blank(buf: &mut [u8], from: usize, to: usize) {
    let to = to.min(buf.len());
    if from < to {
        buf[from..to].fill(b' ');
    }
}

/// Whether the nearest `(` before `start` closes after it, as in
/// `call(a, /* flag */ b)`. An unclosed `(` counts as enclosing.
fn inside_parentheses(work: &[u8], start: usize) -> bool {
    let Some(open) = work[..start].iter().rposition(|&b| b == b'(') else {
        return false;
    };
    let close = work[open..]
        .iter()
        .position(|&b| b == b')')
        .map_or(work.len(), |p| open + p);
    close > start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_and_line_comments() {
        let code = "int main() {\n    /* first block */\n    int a = 1; // trailing note\n}\n";
        let extracted = extract(code).unwrap();
        assert_eq!(extracted.comments, " trailing note\nfirst block\n");
        assert!(!extracted.body.contains("first"));
        assert!(!extracted.body.contains("trailing"));
        assert_eq!(extracted.body.len(), code.len());
        assert!(extracted.body.contains("int a = 1;"));
    }

    #[test]
    fn test_doc_comment_padding_is_trimmed() {
        let code = "/**\n * Adds two numbers.\n **/\nint add(int a, int b);";
        let extracted = extract(code).unwrap();
        assert_eq!(extracted.comments, "Adds two numbers.\n");
    }

    #[test]
    fn test_longest_comments_come_last() {
        let code = "/* short */\n/* a much longer comment */\nx;";
        let extracted = extract(code).unwrap();
        assert_eq!(extracted.comments, "short\na much longer comment\n");
    }

    #[test]
    fn test_argument_comments_are_kept_in_body() {
        let code = "call(a, /* unused */ b);\n";
        let extracted = extract(code).unwrap();
        assert_eq!(extracted.comments, "");
        assert_eq!(extracted.body, code);
    }

    #[test]
    fn test_comment_markers_in_strings_are_ignored() {
        let code = "s = \"http://example.com\";\nt = 1;\n";
        let extracted = extract(code).unwrap();
        assert_eq!(extracted.comments, "");
    }

    #[test]
    fn test_empty_block_comment_terminates() {
        let extracted = extract("/**/ int x; /***/").unwrap();
        assert_eq!(extracted.comments, "\n\n");
    }

    #[test]
    fn test_line_comment_at_end_of_input() {
        let extracted = extract("x; // last").unwrap();
        assert_eq!(extracted.comments, " last\n");
        assert_eq!(extracted.body.trim_end(), "x;");
    }
}
