//! Natural-language helpers for comment and identifier text

pub mod porter;
pub mod stopwords;
pub mod terms;

pub use stopwords::is_stop_word;
pub use terms::{
    comment_terms, extract_terms, identifier_terms, is_integer, line_identifier_terms, stem, stems, TermSet,
};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SILENT_ENDING: Regex = Regex::new(r"(?:[^laeiouy]es|[^laeiouy]e)$").unwrap();
    static ref LEADING_Y: Regex = Regex::new(r"^y").unwrap();
    static ref VOWEL_GROUP: Regex = Regex::new(r"[aeiouy]{1,2}").unwrap();
}

const SENTENCE_ENDERS: &[char] = &['.', '!', '?', ':', ';'];

/// Line separators recognized when splitting text into lines
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Lines of `text` without terminators. `\r\n` is a single break and a
/// trailing break does not open an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Split text into sentences and words.
///
/// A word is a run of characters between whitespace or ASCII punctuation. A
/// sentence ends at `.`, `!`, `?`, `:`, `;` or the end of a line, and only counts
/// when a word has been seen since the previous sentence ended. That flag is not
/// reset at line ends.
pub fn split_sentences_and_words(text: &str) -> (Vec<String>, Vec<String>) {
    let mut sentences = Vec::new();
    let mut words = Vec::new();
    let mut sentence_has_words = false;

    for line in text.split(is_line_break) {
        let mut sentence = String::new();
        let mut word = String::new();

        for c in line.chars() {
            if c.is_whitespace() || c.is_ascii_punctuation() {
                if !word.trim().is_empty() {
                    sentence_has_words = true;
                    words.push(word.trim().to_string());
                }
                word.clear();
            } else {
                word.push(c);
            }

            if SENTENCE_ENDERS.contains(&c) {
                if !sentence.trim().is_empty() && sentence_has_words {
                    sentences.push(sentence.trim().to_string());
                }
                sentence.clear();
                sentence_has_words = false;
            } else {
                sentence.push(c);
            }
        }

        if !word.trim().is_empty() {
            sentence_has_words = true;
            words.push(word.trim().to_string());
        }
        if !sentence.trim().is_empty() && sentence_has_words {
            sentences.push(sentence.trim().to_string());
        }
    }

    (sentences, words)
}

/// Estimate syllables: words of up to three characters have one; otherwise drop a
/// silent `e`/`es` ending and a leading `y`, then count vowel groups of up to two.
pub fn count_syllables(word: &str) -> usize {
    if word.chars().count() <= 3 {
        return 1;
    }
    let word = word.to_lowercase();
    let word = SILENT_ENDING.replace(&word, "");
    let word = LEADING_Y.replace(&word, "");
    VOWEL_GROUP.find_iter(&word).count().max(1)
}
