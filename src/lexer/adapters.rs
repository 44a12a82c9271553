//! Lexer decorators that change how tokens are classified or observed

use super::{Lexer, Token, TokenKind};
use crate::error::LexError;
use rustc_hash::FxHashSet;
use std::sync::{Mutex, PoisonError};

const RSE_OPERATOR_PUNCTUATORS: &[&str] = &[";", "{", "}"];

/// Token view matching the legacy RSE lexer used by the Dorn and Posnett models.
///
/// `;`, `{` and `}` count as operators; every other punctuator collapses to
/// [`TokenKind::Other`].
#[derive(Debug, Clone)]
pub struct RseLexer<L> {
    inner: L,
}

impl<L: Lexer> RseLexer<L> {
    pub fn new(inner: L) -> Self {
        Self { inner }
    }
}

/// Reclassify one token the way the RSE lexer would
pub fn rse_kind(token: &Token) -> TokenKind {
    if token.kind == TokenKind::Punctuation && RSE_OPERATOR_PUNCTUATORS.contains(&token.value.as_str()) {
        TokenKind::Operator
    } else if token.kind.code() > TokenKind::Number.code() {
        TokenKind::Other
    } else {
        token.kind
    }
}

impl<L: Lexer> Lexer for RseLexer<L> {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = self.inner.lex(code)?;
        for token in &mut tokens {
            token.kind = rse_kind(token);
        }
        Ok(tokens)
    }
}

/// Distinct spellings and total count of the tokens seen in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    spellings: FxHashSet<String>,
    length: usize,
}

impl Vocabulary {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut vocabulary = Self::default();
        for token in tokens {
            vocabulary.observe(token);
        }
        vocabulary
    }

    pub fn observe(&mut self, token: &Token) {
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::Operator
            | TokenKind::Literal
            | TokenKind::Number => self.record(&token.value),
            TokenKind::String if token.value.chars().count() > 2 => {
                let mut chars = token.value.chars();
                chars.next();
                chars.next_back();
                self.record(chars.as_str());
            }
            _ => {}
        }
    }

    fn record(&mut self, spelling: &str) {
        if !self.spellings.contains(spelling) {
            self.spellings.insert(spelling.to_string());
        }
        self.length += 1;
    }

    pub fn vocab_size(&self) -> usize {
        self.spellings.len()
    }

    pub fn program_length(&self) -> usize {
        self.length
    }
}

/// Records the [`Vocabulary`] of the most recent `lex` call
#[derive(Debug, Default)]
pub struct VocabularyLexer<L> {
    inner: L,
    last: Mutex<Vocabulary>,
}

impl<L: Lexer> VocabularyLexer<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            last: Mutex::new(Vocabulary::default()),
        }
    }

    /// Vocabulary of the last pass (empty before the first one)
    pub fn vocabulary(&self) -> Vocabulary {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn vocab_size(&self) -> usize {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).vocab_size()
    }

    pub fn program_length(&self) -> usize {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).program_length()
    }
}

impl<L: Lexer> Lexer for VocabularyLexer<L> {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        let tokens = self.inner.lex(code)?;
        let vocabulary = Vocabulary::from_tokens(&tokens);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = vocabulary;
        Ok(tokens)
    }
}
