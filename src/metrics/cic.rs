//! Comments and identifiers consistency
//!
//! Jaccard overlap between the stemmed terms of a snippet's comments and the
//! stemmed terms of its identifiers. The synonym variant widens the identifier
//! side with dictionary synonyms of every identifier term.

use super::{BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::body_comment::comment_corpus;
use crate::analyzer::delete_blank_lines;
use crate::error::FeatureResult;
use crate::lexicon::SharedLexicon;
use crate::text::{comment_terms, identifier_terms, is_integer, stem, stems, TermSet};
use std::sync::Arc;

pub fn calculators(snippet: &Arc<Snippet>, lexicon: &SharedLexicon) -> Vec<BoxedCalculator> {
    vec![
        Box::new(Consistency::new(snippet.clone(), None)),
        Box::new(Consistency::new(snippet.clone(), Some(lexicon.clone()))),
    ]
}

pub struct Consistency {
    snippet: Arc<Snippet>,
    synonyms: Option<SharedLexicon>,
}

impl Consistency {
    /// With a lexicon, identifier terms are extended by their synonyms
    pub fn new(snippet: Arc<Snippet>, synonyms: Option<SharedLexicon>) -> Self {
        Self { snippet, synonyms }
    }

    fn identifier_side(&self, code: &str) -> TermSet {
        let terms = identifier_terms(code);
        let mut stemmed = stems(&terms);
        if let Some(lexicon) = &self.synonyms {
            for term in &terms {
                stemmed.extend(
                    lexicon
                        .synonyms(term)
                        .iter()
                        .filter(|synonym| !is_integer(synonym))
                        .map(|synonym| stem(synonym)),
                );
            }
        }
        stemmed
    }
}

impl FeatureCalculator for Consistency {
    fn name(&self) -> String {
        let prefix = if self.synonyms.is_some() { "Synonym " } else { "" };
        format!("{prefix}Comments and Identifiers Consistency")
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let code = delete_blank_lines(self.snippet.code());
        let comments = comment_terms(&comment_corpus(&code)?);
        let identifiers = self.identifier_side(&code);

        let union = identifiers.union(&comments).count();
        if union == 0 {
            return Ok(0.0);
        }
        let shared = identifiers.intersection(&comments).count();
        Ok(shared as f64 / union as f64)
    }
}
