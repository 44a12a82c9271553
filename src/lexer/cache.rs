//! Content-keyed token cache
//!
//! One snippet is lexed many times over: every metric family asks for the
//! tokens of either the snippet itself or its comment-stripped form. The cache
//! keys entries by an xxh3 hash of the text and confirms hits by comparing the
//! stored text, so a hash collision can never return the wrong tokens.

use super::{Lexer, Token};
use crate::error::LexError;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug)]
struct Entry {
    code: String,
    tokens: Arc<Vec<Token>>,
}

#[derive(Debug)]
pub struct CachedLexer<L> {
    inner: L,
    entries: Mutex<FxHashMap<u64, Entry>>,
}

impl<L: Lexer> CachedLexer<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Tokens for `code`, lexing only when the exact text has not been seen
    pub fn tokens(&self, code: &str) -> Result<Arc<Vec<Token>>, LexError> {
        let key = xxh3_64(code.as_bytes());
        if let Some(entry) = self.lock().get(&key) {
            if entry.code == code {
                debug!(bytes = code.len(), "token cache hit");
                return Ok(Arc::clone(&entry.tokens));
            }
        }

        let tokens = Arc::new(self.inner.lex(code)?);
        self.lock().insert(
            key,
            Entry {
                code: code.to_string(),
                tokens: Arc::clone(&tokens),
            },
        );
        Ok(tokens)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FxHashMap<u64, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<L: Lexer> Lexer for CachedLexer<L> {
    fn lex(&self, code: &str) -> Result<Vec<Token>, LexError> {
        Ok(self.tokens(code)?.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLexer(AtomicUsize);

    impl Lexer for CountingLexer {
        fn lex(&self, _code: &str) -> Result<Vec<Token>, LexError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_cache_lexes_each_text_once() {
        let cached = CachedLexer::new(CountingLexer::default());
        cached.lex("int a;").unwrap();
        cached.lex("int a;").unwrap();
        cached.lex("int b;").unwrap();
        cached.lex("int a;").unwrap();
        assert_eq!(cached.inner.0.load(Ordering::SeqCst), 2);
        assert_eq!(cached.len(), 2);

        cached.clear();
        assert!(cached.is_empty());
        cached.lex("int a;").unwrap();
        assert_eq!(cached.inner.0.load(Ordering::SeqCst), 3);
    }
}
