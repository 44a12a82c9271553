//! Text-level source analysis
//!
//! Comment removal, blank-line filtering and identifier extraction. These work on
//! raw characters rather than tokens, so they stay usable on snippets the
//! tokenizer only partially understands.

pub mod body_comment;
pub mod literals;
pub mod scanner;

pub use body_comment::{extract, BodyComment};
pub use literals::is_inside_literal;
pub use scanner::{comment_ranges, remove_block_comments, remove_ranges, CommentRange};

use crate::lexer::is_cpp_keyword;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INLINE_COMMENT: Regex = Regex::new(r"//[^\n]*\n").unwrap();
    static ref SPACE_RUN: Regex = Regex::new(r" {2,}").unwrap();
    static ref DIGIT: Regex = Regex::new(r"\d").unwrap();
}

/// Remove `//` comments together with their newline. A trailing line comment
/// without a newline is left in place.
pub fn delete_inline_comments(code: &str) -> String {
    INLINE_COMMENT.replace_all(code, "").into_owned()
}

/// Remove line comments, then block comments
pub fn delete_comments(code: &str) -> String {
    remove_block_comments(&delete_inline_comments(code))
}

/// Remove tabs and drop lines that are left empty
pub fn delete_blank_lines(code: &str) -> String {
    code.replace('\t', "")
        .split_inclusive('\n')
        .filter(|line| *line != "\n")
        .collect()
}

/// Words that look like identifiers, in source order, keywords removed.
///
/// Every character that is not alphanumeric, `_`, a space or a newline becomes a
/// space; digits are dropped. Newlines are removed without inserting a space.
pub fn identifiers_from_source(text: &str) -> Vec<String> {
    let only_words: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | ' ' | '\n') {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = SPACE_RUN.replace_all(&only_words, " ");
    let without_digits = DIGIT.replace_all(&collapsed, "").replace('\n', "");

    without_digits
        .split(' ')
        .map(str::trim)
        .filter(|word| !word.is_empty() && !is_cpp_keyword(word))
        .map(str::to_string)
        .collect()
}

/// Split a camelCase or snake_case identifier into its words.
///
/// Boundaries: before an upper-case letter that starts a capitalized word after
/// another upper-case letter (`HTTPServer` → `HTTP Server`), before an upper-case
/// letter that follows anything else, and wherever a letter is followed by a
/// non-letter. The result may contain empty strings at the edges.
pub fn identifier_words(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut spaced = String::with_capacity(identifier.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && is_word_boundary(chars[i - 1], c, chars.get(i + 1).copied()) {
            spaced.push(' ');
        }
        spaced.push(if c == '_' { ' ' } else { c });
    }

    SPACE_RUN
        .replace_all(&spaced, " ")
        .replace('\n', "")
        .split(' ')
        .map(str::to_string)
        .collect()
}

fn is_word_boundary(prev: char, next: char, after: Option<char>) -> bool {
    let acronym_end = prev.is_ascii_uppercase()
        && next.is_ascii_uppercase()
        && after.is_some_and(|c| c.is_ascii_lowercase());
    let camel_hump = !prev.is_ascii_uppercase() && next.is_ascii_uppercase();
    let letter_end = prev.is_ascii_alphabetic() && !next.is_ascii_alphabetic();
    acronym_end || camel_hump || letter_end
}
