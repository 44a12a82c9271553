//! Error types shared across the extraction engine

use crate::lexer::TokenKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning source text into tokens
#[derive(Error, Debug)]
pub enum LexError {
    #[error("Failed to load the C++ grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Tree-sitter returned no syntax tree")]
    NoTree,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Errors raised by the heuristic comment/literal scanner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Backward literal scan ran past the start of the buffer (quote at offset {offset})")]
    RanPastStart { offset: usize },
}

/// Errors raised while computing a single feature
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("Tokenization failed: {0}")]
    Lex(#[from] LexError),

    #[error("Comment scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("{metric}: the snippet has no lines")]
    EmptySnippet { metric: String },

    #[error("Color matrix cannot represent multi-line {kind:?} token {value:?}")]
    MultiLineToken { value: String, kind: TokenKind },

    #[error("Token {value:?} at {line}:{column} lies outside the snippet")]
    TokenOutOfRange {
        value: String,
        line: usize,
        column: usize,
    },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

pub type FeatureResult<T> = Result<T, FeatureError>;

/// Errors raised while loading a lexical database
#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("WordNet file {path} could not be read: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed WordNet entry in {file}: {line}")]
    Malformed { file: String, line: String },
}

/// Errors raised by the readability classifier boundary
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Model has {names} feature names but {coefficients} coefficients")]
    Inconsistent { names: usize, coefficients: usize },

    #[error("Model has {actual} {field}, expected {expected}")]
    Scaling {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Feature(#[from] FeatureError),
}
