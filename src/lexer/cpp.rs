//! C++ tokenizer backed by tree-sitter
//!
//! Walks the leaves of the concrete syntax tree in source order and classifies
//! each one the way a raw preprocessor-level lexer would: keywords, identifiers,
//! literals, comments and punctuators. Regions the grammar keeps opaque
//! (macro bodies, `<header>` names, error recovery) are re-lexed by [`super::raw`].

use super::raw::{self, RawKind};
use super::{classify_punctuator, classify_word, refine_literal, Lexer, Position, Token, TokenKind};
use crate::error::LexError;
use line_numbers::LinePositions;
use tracing::debug;
use tree_sitter::{Node, Parser};

/// Leaves that are kept whole even when the grammar gives them children
const ATOMIC_LITERALS: &[&str] = &["string_literal", "raw_string_literal", "char_literal", "number_literal"];

/// Leaves whose text is re-lexed character by character
const OPAQUE_LEAVES: &[&str] = &["preproc_arg", "system_lib_string", "ERROR"];

#[derive(Debug, Default, Clone, Copy)]
pub struct CppLexer;

impl CppLexer {
    pub fn new() -> Self {
        Self
    }
}

impl Lexer for CppLexer {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_cpp::LANGUAGE.into())?;

        let tree = parser.parse(code, None).ok_or(LexError::NoTree)?;
        let root = tree.root_node();
        if root.has_error() {
            debug!("tree-sitter recovered from syntax errors while lexing snippet");
        }

        let mut builder = TokenBuilder::new(code);
        let mut cursor = root.walk();
        loop {
            let node = cursor.node();
            let atomic = node.child_count() == 0 || ATOMIC_LITERALS.contains(&node.kind());
            if atomic {
                builder.leaf(node);
            } else if cursor.goto_first_child() {
                continue;
            }

            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(builder.finish());
                }
            }
        }
    }
}

/// Accumulates tokens while tracking the last covered byte so gaps can be re-lexed
struct TokenBuilder<'a> {
    code: &'a str,
    positions: LinePositions,
    covered: usize,
    tokens: Vec<Token>,
}

impl<'a> TokenBuilder<'a> {
    fn new(code: &'a str) -> Self {
        Self {
            code,
            positions: LinePositions::from(code),
            covered: 0,
            tokens: Vec::new(),
        }
    }

    fn leaf(&mut self, node: Node) {
        let (start, end) = (node.start_byte(), node.end_byte());
        if node.is_missing() || end <= start || start < self.covered {
            return;
        }
        self.gap(start);

        let text = &self.code[start..end];
        let kind = node.kind();
        if kind == "comment" {
            self.push(start, end, TokenKind::Comment);
        } else if ATOMIC_LITERALS.contains(&kind) {
            self.push(start, end, refine_literal(text));
        } else if OPAQUE_LEAVES.contains(&kind) {
            self.relex(start, end);
        } else if text.len() > 1 && text.starts_with('#') {
            self.directive(start, end);
        } else if is_word(text) {
            self.push(start, end, classify_word(text));
        } else if is_single_punctuator(text) {
            self.push(start, end, classify_punctuator(text));
        } else {
            self.relex(start, end);
        }
        self.covered = end;
    }

    /// `#include`, `#  if`, `#pragma`: a `#` punctuator followed by the directive word
    fn directive(&mut self, start: usize, end: usize) {
        self.push(start, start + 1, TokenKind::Punctuation);
        self.relex(start + 1, end);
    }

    /// Re-lex any non-blank text the tree did not cover
    fn gap(&mut self, until: usize) {
        if self.code[self.covered..until].trim().is_empty() {
            return;
        }
        debug!(from = self.covered, to = until, "re-lexing text outside the syntax tree");
        self.relex(self.covered, until);
    }

    fn relex(&mut self, start: usize, end: usize) {
        for lexeme in raw::scan(&self.code[start..end]) {
            let (from, to) = (start + lexeme.start, start + lexeme.end);
            let text = &self.code[from..to];
            let kind = match lexeme.kind {
                RawKind::Word => classify_word(text),
                RawKind::Literal => refine_literal(text),
                RawKind::Comment => TokenKind::Comment,
                RawKind::Punct => classify_punctuator(text),
            };
            self.push(from, to, kind);
        }
    }

    fn push(&mut self, start: usize, end: usize, kind: TokenKind) {
        let token = Token::new(
            &self.code[start..end],
            self.position(start),
            self.position(end),
            kind,
        );
        self.tokens.push(token);
    }

    fn position(&self, offset: usize) -> Position {
        let line = self.positions.from_offset(offset).as_usize();
        let line_start = self.code[..offset].rfind('\n').map_or(0, |p| p + 1);
        Position::new(line + 1, offset - line_start + 1, offset)
    }

    fn finish(mut self) -> Vec<Token> {
        self.gap(self.code.len());
        self.tokens
    }
}

fn is_word(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_single_punctuator(text: &str) -> bool {
    let lexemes = raw::scan(text);
    lexemes.len() == 1 && lexemes[0].kind == RawKind::Punct && lexemes[0].end == text.len()
}
