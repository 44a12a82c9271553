//! Size and information features from Posnett's simpler readability model

use super::{BoxedCalculator, FeatureCalculator, Snippet};
use crate::error::FeatureResult;
use crate::lexer::{Lexer, RseLexer, SharedLexer, VocabularyLexer};
use std::sync::Arc;

pub fn calculators(snippet: &Arc<Snippet>) -> Vec<BoxedCalculator> {
    vec![
        Box::new(Lines::new(snippet.clone())),
        Box::new(Entropy::new(snippet.clone())),
        Box::new(Volume::new(snippet.clone())),
    ]
}

/// Halstead volume: `length * log2(vocabulary)`, 0 for an empty vocabulary
pub fn halstead_volume(program_length: usize, vocab_size: usize) -> f64 {
    if vocab_size == 0 {
        return 0.0;
    }
    program_length as f64 * (vocab_size as f64).log2()
}

/// Number of `\n`-separated pieces, so a trailing newline adds a line
pub struct Lines {
    snippet: Arc<Snippet>,
}

impl Lines {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for Lines {
    fn name(&self) -> String {
        "Posnett lines".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        Ok(self.snippet.code().split('\n').count() as f64)
    }
}

/// Shannon entropy (natural log) of the snippet's UTF-8 bytes
pub struct Entropy {
    snippet: Arc<Snippet>,
}

impl Entropy {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for Entropy {
    fn name(&self) -> String {
        "Posnett entropy".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let bytes = self.snippet.code().as_bytes();
        if bytes.is_empty() {
            return Ok(0.0);
        }

        let mut counts = [0usize; 256];
        for &b in bytes {
            counts[b as usize] += 1;
        }
        let total = bytes.len() as f64;
        let entropy: f64 = counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                p * p.ln()
            })
            .sum();
        Ok(-entropy)
    }
}

/// Halstead volume over the RSE token view
pub struct Volume {
    snippet: Arc<Snippet>,
    lexer: VocabularyLexer<RseLexer<SharedLexer>>,
}

impl Volume {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        let lexer = VocabularyLexer::new(RseLexer::new(snippet.lexer().clone()));
        Self { snippet, lexer }
    }
}

impl FeatureCalculator for Volume {
    fn name(&self) -> String {
        "Posnett volume".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        self.lexer.lex(self.snippet.code())?;
        let vocabulary = self.lexer.vocabulary();
        Ok(halstead_volume(vocabulary.program_length(), vocabulary.vocab_size()))
    }
}
