//! Readability feature calculators
//!
//! Every feature is a [`FeatureCalculator`] bound to one [`Snippet`]. Calculators
//! for the same snippet share it through an `Arc`, so the token stream is
//! produced once no matter how many features read it.
//!
//! Families:
//! - [`buse_weimer`]: per-line structural counts
//! - [`dorn`]: alignment, color areas and frequency-domain bandwidths
//! - [`posnett`]: lines, byte entropy and Halstead volume
//! - [`itid`], [`cic`], [`cr`], [`noc`], [`tc`]: textual and semantic features

pub mod buse_weimer;
pub mod cic;
pub mod color_matrix;
pub mod cr;
pub mod dorn;
pub mod fourier;
pub mod itid;
pub mod noc;
pub mod posnett;
pub mod tc;

pub use color_matrix::{Canvas, ColorMatrix};

use crate::error::FeatureResult;
use crate::lexer::{SharedLexer, Token};
use std::fmt;
use std::sync::OnceLock;

pub const DEFAULT_TAB_SIZE: usize = 4;

/// One source snippet plus the lexer used to tokenize it
pub struct Snippet {
    code: String,
    tab_size: usize,
    lexer: SharedLexer,
    tokens: OnceLock<Vec<Token>>,
}

impl Snippet {
    pub fn new(code: &str, lexer: SharedLexer) -> Self {
        Self::with_tab_size(code, lexer, DEFAULT_TAB_SIZE)
    }

    /// Tabs in `code` are replaced by `tab_size` spaces
    pub fn with_tab_size(code: &str, lexer: SharedLexer, tab_size: usize) -> Self {
        Self {
            code: code.replace('\t', &" ".repeat(tab_size)),
            tab_size,
            lexer,
            tokens: OnceLock::new(),
        }
    }

    /// A new snippet over `code` sharing this snippet's lexer and tab size
    pub fn derive(&self, code: &str) -> Self {
        Self::with_tab_size(code, self.lexer.clone(), self.tab_size)
    }

    /// The same code tokenized by `lexer`
    pub fn with_lexer(&self, lexer: SharedLexer) -> Self {
        Self {
            code: self.code.clone(),
            tab_size: self.tab_size,
            lexer,
            tokens: OnceLock::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn lexer(&self) -> &SharedLexer {
        &self.lexer
    }

    /// Lines split on `\n`, terminators kept
    pub fn lines(&self) -> Vec<&str> {
        self.code.split_inclusive('\n').collect()
    }

    /// Tokens of the snippet, computed on first use
    pub fn tokens(&self) -> FeatureResult<&[Token]> {
        if let Some(tokens) = self.tokens.get() {
            return Ok(tokens);
        }
        let tokens = self.lexer.lex(&self.code)?;
        Ok(self.tokens.get_or_init(|| tokens))
    }
}

impl fmt::Debug for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snippet")
            .field("code", &self.code)
            .field("tab_size", &self.tab_size)
            .field("tokenized", &self.tokens.get().is_some())
            .finish()
    }
}

/// A single named readability feature
pub trait FeatureCalculator: Send + Sync {
    /// Display name, used as the key in feature vectors
    fn name(&self) -> String;

    fn calculate_metric(&self) -> FeatureResult<f64>;
}

pub type BoxedCalculator = Box<dyn FeatureCalculator>;

/// How per-line or per-item values are folded into one feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Min,
    Avg,
    Max,
}

impl Aggregation {
    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Min => "MIN",
            Aggregation::Avg => "AVG",
            Aggregation::Max => "MAX",
        }
    }

    /// Fold `values`; an empty population gives 0
    pub fn apply(self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        match self {
            Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Aggregation::Avg => values.iter().sum::<f64>() / values.len() as f64,
            Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Snippet;
    use crate::lexer::{CppLexer, SharedLexer};
    use std::sync::Arc;

    pub fn lexer() -> SharedLexer {
        Arc::new(CppLexer::new())
    }

    pub fn snippet(code: &str) -> Arc<Snippet> {
        Arc::new(Snippet::new(code, lexer()))
    }

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::snippet;
    use super::*;

    #[test]
    fn test_tabs_expanded() {
        let lexer = test_support::lexer();
        let snippet = Snippet::with_tab_size("\tint a;\n", lexer, 2);
        assert_eq!(snippet.code(), "  int a;\n");
        assert_eq!(snippet.tab_size(), 2);
    }

    #[test]
    fn test_lines_keep_terminators() {
        assert_eq!(snippet("a\r\nb\n\nc").lines(), vec!["a\r\n", "b\n", "\n", "c"]);
        assert!(snippet("").lines().is_empty());
    }

    #[test]
    fn test_tokens_memoized() {
        let snippet = snippet("int main() {}");
        let first = snippet.tokens().unwrap().as_ptr();
        let second = snippet.tokens().unwrap().as_ptr();
        assert_eq!(first, second);
        assert_eq!(snippet.tokens().unwrap()[1].value, "main");
    }

    #[test]
    fn test_aggregation() {
        let values = [3.0, 1.0, 2.0];
        assert_eq!(Aggregation::Min.apply(&values), 1.0);
        assert_eq!(Aggregation::Avg.apply(&values), 2.0);
        assert_eq!(Aggregation::Max.apply(&values), 3.0);
        assert_eq!(Aggregation::Max.apply(&[]), 0.0);
        assert_eq!(Aggregation::Avg.to_string(), "AVG");
    }
}
