//! Flesch reading ease of a snippet's comments

use super::{BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::body_comment::comment_corpus;
use crate::analyzer::delete_blank_lines;
use crate::error::FeatureResult;
use crate::text::{count_syllables, split_sentences_and_words};
use std::sync::Arc;

pub fn calculators(snippet: &Arc<Snippet>) -> Vec<BoxedCalculator> {
    vec![Box::new(CommentsReadability::new(snippet.clone()))]
}

pub struct CommentsReadability {
    snippet: Arc<Snippet>,
}

impl CommentsReadability {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for CommentsReadability {
    fn name(&self) -> String {
        "Comments Readability".to_string()
    }

    /// Both ratios use integer division. 0 without words or sentences.
    fn calculate_metric(&self) -> FeatureResult<f64> {
        let corpus = comment_corpus(&delete_blank_lines(self.snippet.code()))?;
        let (sentences, words) = split_sentences_and_words(&corpus);
        if words.is_empty() || sentences.is_empty() {
            return Ok(0.0);
        }

        let syllables: usize = words.iter().map(|word| count_syllables(word)).sum();
        let words_per_sentence = words.len() / sentences.len();
        let syllables_per_word = syllables / words.len();
        Ok(206.835 - 1.015 * words_per_sentence as f64 - 84.6 * syllables_per_word as f64)
    }
}
