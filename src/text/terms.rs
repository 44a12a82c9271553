//! Term extraction shared by the textual metrics
//!
//! A term is a lower-case word taken from an identifier or a comment after
//! splitting camelCase/snake_case, with keywords and stop words removed.
//! Comment terms are additionally reduced to their stems.

use super::is_line_break;
use super::porter;
use super::stopwords::is_stop_word;
use crate::analyzer::{delete_blank_lines, delete_comments, identifier_words, identifiers_from_source};
use std::collections::BTreeSet;

/// Ordered so dictionaries built from terms are deterministic
pub type TermSet = BTreeSet<String>;

/// Terms of `text`: identifier-shaped words split into lower-case parts, stop words dropped
pub fn extract_terms(text: &str) -> TermSet {
    identifiers_from_source(text)
        .iter()
        .flat_map(|word| identifier_words(word))
        .filter(|part| !part.is_empty())
        .map(|part| part.trim().to_lowercase())
        .filter(|term| !term.is_empty() && !is_stop_word(term))
        .collect()
}

/// Porter stem of a term
pub fn stem(term: &str) -> String {
    porter::stem(term)
}

pub fn stems<'a>(terms: impl IntoIterator<Item = &'a String>) -> TermSet {
    terms.into_iter().map(|t| stem(t)).collect()
}

/// Whether `term` reads as a whole number; such terms have no dictionary senses
pub fn is_integer(term: &str) -> bool {
    term.trim().parse::<i64>().is_ok()
}

/// Stemmed terms of a comment corpus; newlines are treated as word breaks
pub fn comment_terms(corpus: &str) -> TermSet {
    stems(&extract_terms(&corpus.replace('\n', " ")))
}

/// Unstemmed terms of the code with comments removed
pub fn identifier_terms(code: &str) -> TermSet {
    extract_terms(&delete_comments(code))
}

/// Unstemmed terms of each non-blank line of comment-free code
pub fn line_identifier_terms(code: &str) -> Vec<TermSet> {
    let code = delete_comments(&delete_blank_lines(code));
    code.split(is_line_break)
        .filter(|line| !line.trim().is_empty())
        .map(extract_terms)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> TermSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_extract_terms_splits_and_filters() {
        let terms = extract_terms("int getUserName(char* the_buffer) { return isValid; }");
        assert_eq!(terms, set(&["get", "user", "name", "buffer", "valid"]));
    }

    #[test]
    fn test_stems() {
        assert_eq!(stem("enable"), "enabl");
        assert_eq!(stem("computation"), "comput");
        assert_eq!(stem("var"), "var");
        assert_eq!(["fairly", "generalization", "generate"].map(stem), ["fairli", "gener", "gener"]);
    }

    #[test]
    fn test_is_integer() {
        assert!(is_integer("42"));
        assert!(is_integer("-7"));
        assert!(!is_integer("x1"));
        assert!(!is_integer(""));
    }

    #[test]
    fn test_comment_terms_are_stemmed() {
        let terms = comment_terms("Enables the\ncomputation");
        assert_eq!(terms, set(&["enabl", "comput"]));
    }

    #[test]
    fn test_identifier_terms_skip_comments() {
        let terms = identifier_terms("int total = 0; // running sum\n/* hidden */ count++;\n");
        assert_eq!(terms, set(&["total", "count"]));
    }

    #[test]
    fn test_line_identifier_terms() {
        let code = "int someVar = 1;\n\n// note\nreturn x;\n}\n";
        let lines = line_identifier_terms(code);
        assert_eq!(lines, vec![set(&["some", "var"]), set(&["x"]), set(&[])]);
    }
}
