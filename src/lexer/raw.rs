//! Raw character-level lexer for fragments the syntax tree leaves opaque
//!
//! Tree-sitter hands back some regions as single leaves (`preproc_arg`,
//! `system_lib_string`, error recovery leaves) or skips them entirely. Those
//! regions are re-lexed here so every non-blank byte ends up in a token.

/// Coarse class of a raw lexeme, refined by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawKind {
    Word,
    Literal,
    Comment,
    Punct,
}

/// A lexeme as a byte range relative to the scanned fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawToken {
    pub start: usize,
    pub end: usize,
    pub kind: RawKind,
}

/// Punctuators, longest first so the first prefix match is the longest one
const PUNCTUATORS: &[&str] = &[
    "->*", "<<=", ">>=", "...", "<=>", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&",
    "||", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "::", ".*", "##",
];

const LITERAL_PREFIXES: &[&str] = &["u8", "u", "U", "L", "R", "u8R", "uR", "UR", "LR"];

pub(crate) fn scan(fragment: &str) -> Vec<RawToken> {
    let bytes = fragment.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        let (end, kind) = if fragment[i..].starts_with("//") {
            (line_end(bytes, i), RawKind::Comment)
        } else if fragment[i..].starts_with("/*") {
            let end = fragment[i + 2..]
                .find("*/")
                .map_or(bytes.len(), |p| i + 2 + p + 2);
            (end, RawKind::Comment)
        } else if c == b'"' {
            (quoted_end(bytes, i, b'"'), RawKind::Literal)
        } else if c == b'\'' {
            (quoted_end(bytes, i, b'\''), RawKind::Literal)
        } else if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            (number_end(bytes, i), RawKind::Literal)
        } else if c == b'_' || c.is_ascii_alphabetic() || (!c.is_ascii() && starts_word(&fragment[i..])) {
            let word_end = word_end(fragment, i);
            let word = &fragment[i..word_end];
            match bytes.get(word_end) {
                Some(b'"') if LITERAL_PREFIXES.contains(&word) => {
                    if word.ends_with('R') {
                        (raw_string_end(fragment, word_end), RawKind::Literal)
                    } else {
                        (quoted_end(bytes, word_end, b'"'), RawKind::Literal)
                    }
                }
                Some(b'\'') if LITERAL_PREFIXES.contains(&word) && !word.ends_with('R') => {
                    (quoted_end(bytes, word_end, b'\''), RawKind::Literal)
                }
                _ => (word_end, RawKind::Word),
            }
        } else {
            let len = PUNCTUATORS
                .iter()
                .find(|p| fragment[i..].starts_with(**p))
                .map_or_else(|| char_len(fragment, i), |p| p.len());
            (i + len, RawKind::Punct)
        };

        tokens.push(RawToken { start, end, kind });
        i = end;
    }

    tokens
}

fn starts_word(rest: &str) -> bool {
    rest.chars().next().is_some_and(char::is_alphabetic)
}

fn char_len(fragment: &str, i: usize) -> usize {
    fragment[i..].chars().next().map_or(1, char::len_utf8)
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |p| from + p)
}

fn word_end(fragment: &str, from: usize) -> usize {
    fragment[from..]
        .char_indices()
        .find(|(_, ch)| !(ch.is_alphanumeric() || *ch == '_'))
        .map_or(fragment.len(), |(p, _)| from + p)
}

/// End of a quoted literal opened at `open`; stops at the closing quote or the end of the line
fn quoted_end(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn raw_string_end(fragment: &str, quote: usize) -> usize {
    let after_quote = quote + 1;
    let Some(paren) = fragment[after_quote..].find('(') else {
        return quoted_end(fragment.as_bytes(), quote, b'"');
    };
    let delimiter = &fragment[after_quote..after_quote + paren];
    let closing = format!("){}\"", delimiter);
    let body = after_quote + paren + 1;
    fragment[body..]
        .find(&closing)
        .map_or(fragment.len(), |p| body + p + closing.len())
}

fn number_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        let exponent_sign = (b == b'+' || b == b'-')
            && i > from
            && matches!(bytes[i - 1], b'e' | b'E' | b'p' | b'P');
        if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'\'' || exponent_sign {
            i += 1;
        } else {
            break;
        }
    }
    i
}
