//! Quote-balance heuristic for "is this offset inside a string or char literal"
//!
//! Quotes are paired left to right: single quotes first, skipping apostrophes
//! that sit inside a comment or an already-open literal, then double quotes,
//! each opening quote checked recursively. Escaped quotes are not recognized.
//! The quote positions live in an immutable [`QuoteSpans`] value; resolving a
//! pair produces a new value instead of editing the text.

use crate::error::ScanError;
use std::collections::BTreeSet;

/// Byte offsets of the quotes that have not been paired yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteSpans {
    single: BTreeSet<usize>,
    double: BTreeSet<usize>,
}

impl QuoteSpans {
    pub fn of(text: &str) -> Self {
        let mut spans = Self::default();
        for (i, b) in text.bytes().enumerate() {
            match b {
                b'\'' => {
                    spans.single.insert(i);
                }
                b'"' => {
                    spans.double.insert(i);
                }
                _ => {}
            }
        }
        spans
    }

    fn first_single(&self) -> Option<usize> {
        self.single.first().copied()
    }

    fn first_double(&self) -> Option<usize> {
        self.double.first().copied()
    }

    fn without_single(&self, at: usize) -> Self {
        let mut next = self.clone();
        next.single.remove(&at);
        next
    }

    fn without_double(&self, at: usize) -> Self {
        let mut next = self.clone();
        next.double.remove(&at);
        next
    }
}

/// Whether byte offset `pos` of `text` falls strictly between a pair of quotes
pub fn is_inside_literal(text: &str, pos: usize) -> Result<bool, ScanError> {
    inside_literal(text.as_bytes(), &QuoteSpans::of(text), pos)
}

fn inside_literal(text: &[u8], spans: &QuoteSpans, pos: usize) -> Result<bool, ScanError> {
    let mut quotes = spans.clone();

    while quotes.single.len() > 1 {
        let Some(open) = quotes.first_single().filter(|&q| q < pos) else {
            break;
        };
        if apostrophe_in_comment_or_literal(text, &quotes, open)? {
            quotes = quotes.without_single(open);
            continue;
        }
        quotes = quotes.without_single(open);
        let close = quotes.first_single().unwrap_or(open);
        quotes = quotes.without_single(close);
        if open < pos && pos < close {
            return Ok(true);
        }
    }

    while quotes.double.len() > 1 {
        let Some(open) = quotes.first_double().filter(|&q| q < pos) else {
            break;
        };
        if inside_literal(text, &quotes, open)? {
            quotes = quotes.without_double(open);
            continue;
        }
        quotes = quotes.without_double(open);
        let close = quotes.first_double().unwrap_or(open);
        quotes = quotes.without_double(close);
        if open < pos && pos < close {
            return Ok(true);
        }
    }

    Ok(false)
}

/// An apostrophe is not a quote when it sits in an open literal or after a
/// `//` or `/*` on the same statement (scanning back to the previous `;`).
fn apostrophe_in_comment_or_literal(text: &[u8], quotes: &QuoteSpans, at: usize) -> Result<bool, ScanError> {
    if inside_literal(text, quotes, at)? {
        return Ok(true);
    }
    if at == 0 {
        return Err(ScanError::RanPastStart { offset: at });
    }

    let mut t = at - 1;
    while text[t] != b';' && t >= 1 {
        if text[t - 1] == b'/' && matches!(text[t], b'*' | b'/') {
            return Ok(true);
        }
        t -= 1;
    }
    Ok(false)
}
