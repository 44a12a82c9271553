//! Tokenization of C++ snippets
//!
//! A [`Lexer`] turns source text into an ordered list of classified [`Token`]s.
//! The concrete engine is tree-sitter-cpp ([`cpp::CppLexer`]); the other types
//! in this module are adapters that wrap any lexer:
//!
//! - [`RseLexer`] reclassifies punctuation for parity with the legacy RSE feature model
//! - [`VocabularyLexer`] records distinct spellings and the token count of the last pass
//! - [`CachedLexer`] memoizes token lists by content

pub mod adapters;
pub mod cache;
pub mod cpp;
mod raw;

pub use adapters::{RseLexer, Vocabulary, VocabularyLexer};
pub use cache::CachedLexer;
pub use cpp::CppLexer;

use crate::error::LexError;
use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Token classes. The numeric codes are part of the feature contract: they are
/// the cell values of the color matrix and the RSE adapter compares against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Other = 0,
    Identifier = 1,
    Comment = 2,
    Keyword = 3,
    Operator = 4,
    Literal = 5,
    String = 6,
    Number = 7,
    Punctuation = 10,
}

impl TokenKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Upper-case name used in feature names, e.g. `Dorn Areas IDENTIFIERs`
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Other => "OTHER",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Comment => "COMMENT",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Literal => "LITERAL",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Punctuation => "PUNCTUATION",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source position: 1-based line and byte column, 0-based byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub value: String,
    pub start: Position,
    pub end: Position,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(value: impl Into<String>, start: Position, end: Position, kind: TokenKind) -> Self {
        Self {
            value: value.into(),
            start,
            end,
            kind,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }
}

/// Anything that can turn source text into tokens
pub trait Lexer: Send + Sync {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError>;
}

impl<L: Lexer + ?Sized> Lexer for Arc<L> {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        (**self).lex(code)
    }
}

impl<L: Lexer + ?Sized> Lexer for &L {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        (**self).lex(code)
    }
}

pub type SharedLexer = Arc<dyn Lexer>;

/// Source languages the engine can analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Cpp,
}

impl Language {
    /// The plain tokenizer for this language wrapped in a content cache.
    /// The cache never evicts, so build one per snippet.
    pub fn lexer(self) -> Arc<CachedLexer<CppLexer>> {
        match self {
            Language::Cpp => Arc::new(CachedLexer::new(CppLexer::new())),
        }
    }
}

impl FromStr for Language {
    type Err = LexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(LexError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// C++ keywords and preprocessor words excluded from term extraction
pub const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "atomic_cancel", "atomic_commit",
    "atomic_noexcept", "auto", "bitand", "bitor", "bool", "break", "case", "catch", "char",
    "char8_t", "char16_t", "char32_t", "class", "compl", "concept", "const", "consteval",
    "constexpr", "constinit", "const_cast", "continue", "co_await", "co_return", "co_yield",
    "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum", "explicit",
    "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline", "int", "long",
    "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr", "operator", "or",
    "or_eq", "private", "protected", "public", "reflexpr", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "synchronized", "template", "this", "thread_local", "throw", "true",
    "try", "typedef", "typeid", "typename", "union", "unsigned", "using", "virtual", "void",
    "volatile", "wchar_t", "while", "xor", "xor_eq", "if", "elif", "else", "endif", "ifdef", "ifndef",
    "elifdef", "elifndef",
];

/// Words that only name preprocessor directives; the tokenizer reports them as identifiers
const DIRECTIVE_ONLY: &[&str] = &["elif", "endif", "ifdef", "ifndef", "elifdef", "elifndef"];

/// Punctuators reported as OPERATOR
pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%",
    "++", "--", "[", "]", "(", ")", ".", "->",
    ".*", "->*",
    "<<", ">>", "|", "^", "&", "~",
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", ">>=", "<<=",
    "==", "!=", ">", ">=", "<", "<=",
    "&&", "||", "!",
    "?", ":",
    "::",
    ",",
    "...",
];

lazy_static! {
    static ref KEYWORD_SET: FxHashSet<&'static str> = CPP_KEYWORDS.iter().copied().collect();
    static ref LEXER_KEYWORD_SET: FxHashSet<&'static str> = CPP_KEYWORDS
        .iter()
        .copied()
        .filter(|k| !DIRECTIVE_ONLY.contains(k))
        .collect();
    static ref OPERATOR_SET: FxHashSet<&'static str> = OPERATORS.iter().copied().collect();
    static ref STRING_LITERAL: Regex = Regex::new(r#"^(u8|u|U|L)?R?".*"$"#).unwrap();
    static ref FLOAT_LITERAL: Regex = Regex::new(r"^-?\d*\.\d*(e\d+)?([fF])?([lL])?$").unwrap();
    static ref INTEGER_LITERAL: Regex = Regex::new(
        r"^((-?\d+([uU])?(l{1,2}|L{1,2})?)|(0([xX])(\d|[a-f]|[A-F])+([uU])?(l{1,2}|L{1,2})?))$"
    )
    .unwrap();
}

/// Whether `word` is in the term-extraction keyword list
pub fn is_cpp_keyword(word: &str) -> bool {
    KEYWORD_SET.contains(word)
}

/// Kind of a word-shaped token: KEYWORD for language keywords, IDENTIFIER otherwise
pub(crate) fn classify_word(word: &str) -> TokenKind {
    if LEXER_KEYWORD_SET.contains(word) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    }
}

/// Kind of a punctuator: OPERATOR when in the operator set, PUNCTUATION otherwise
pub(crate) fn classify_punctuator(text: &str) -> TokenKind {
    if OPERATOR_SET.contains(text) {
        TokenKind::Operator
    } else {
        TokenKind::Punctuation
    }
}

/// Refine a literal spelling into STRING, NUMBER or plain LITERAL
pub fn refine_literal(spelling: &str) -> TokenKind {
    // `.` does not cross newlines, so multi-line raw strings stay LITERAL
    if STRING_LITERAL.is_match(spelling) {
        TokenKind::String
    } else if INTEGER_LITERAL.is_match(spelling) || FLOAT_LITERAL.is_match(spelling) {
        TokenKind::Number
    } else {
        TokenKind::Literal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_literal() {
        assert_eq!(refine_literal("\"abc\""), TokenKind::String);
        assert_eq!(refine_literal("u8\"abc\""), TokenKind::String);
        assert_eq!(refine_literal("LR\"(x)\""), TokenKind::String);
        assert_eq!(refine_literal("42"), TokenKind::Number);
        assert_eq!(refine_literal("42ul"), TokenKind::Number);
        assert_eq!(refine_literal("0xFFu"), TokenKind::Number);
        assert_eq!(refine_literal("12."), TokenKind::Number);
        assert_eq!(refine_literal(".12f"), TokenKind::Number);
        assert_eq!(refine_literal("3.4028234e38l"), TokenKind::Number);
        assert_eq!(refine_literal("'a'"), TokenKind::Literal);
        assert_eq!(refine_literal("1'000"), TokenKind::Literal);
    }

    #[test]
    fn test_keyword_sets() {
        assert!(is_cpp_keyword("endif"));
        assert_eq!(classify_word("endif"), TokenKind::Identifier);
        assert_eq!(classify_word("while"), TokenKind::Keyword);
        assert_eq!(classify_word("include"), TokenKind::Identifier);
        assert_eq!(classify_word("nullptr"), TokenKind::Keyword);
    }

    #[test]
    fn test_classify_punctuator() {
        assert_eq!(classify_punctuator("->*"), TokenKind::Operator);
        assert_eq!(classify_punctuator("..."), TokenKind::Operator);
        assert_eq!(classify_punctuator(";"), TokenKind::Punctuation);
        assert_eq!(classify_punctuator("{"), TokenKind::Punctuation);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        assert!("java".parse::<Language>().is_err());
    }
}
