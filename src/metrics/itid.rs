//! Dictionary-based identifier features, aggregated over lines
//!
//! - ITID: share of a line's identifier terms that are dictionary words
//! - NM: total number of senses of a line's terms
//! - NMI: total hypernym depth of a line's terms (narrow words sit deeper)
//!
//! Lines without terms are skipped. Integer terms and terms the dictionary does
//! not know contribute nothing, but ITID still counts them in the denominator.

use super::{Aggregation, BoxedCalculator, FeatureCalculator, Snippet};
use crate::error::FeatureResult;
use crate::lexicon::SharedLexicon;
use crate::text::{is_integer, line_identifier_terms, TermSet};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryMetric {
    TermsInDictionary,
    NumberOfMeanings,
    NarrowMeaning,
}

impl DictionaryMetric {
    /// Registry order with the aggregations each metric is reported under
    pub const ALL: [(DictionaryMetric, &'static [Aggregation]); 3] = [
        (
            DictionaryMetric::TermsInDictionary,
            &[Aggregation::Min, Aggregation::Avg],
        ),
        (
            DictionaryMetric::NumberOfMeanings,
            &[Aggregation::Avg, Aggregation::Max],
        ),
        (
            DictionaryMetric::NarrowMeaning,
            &[Aggregation::Min, Aggregation::Avg, Aggregation::Max],
        ),
    ];

    pub fn name(self) -> &'static str {
        match self {
            DictionaryMetric::TermsInDictionary => "Identifier Terms in Dictionary",
            DictionaryMetric::NumberOfMeanings => "Number of Meanings",
            DictionaryMetric::NarrowMeaning => "Narrow Meaning Identifiers",
        }
    }
}

pub fn calculators(snippet: &Arc<Snippet>, lexicon: &SharedLexicon) -> Vec<BoxedCalculator> {
    let terms = Arc::new(LineTerms::new(snippet.clone()));
    let mut calculators: Vec<BoxedCalculator> = Vec::new();
    for ignore_one_letter in [false, true] {
        for (metric, aggregations) in DictionaryMetric::ALL {
            for &aggregation in aggregations {
                calculators.push(Box::new(DictionaryFeature {
                    terms: terms.clone(),
                    lexicon: lexicon.clone(),
                    metric,
                    aggregation,
                    ignore_one_letter,
                }));
            }
        }
    }
    calculators
}

/// Identifier terms per line, shared by every dictionary feature of a snippet
pub struct LineTerms {
    snippet: Arc<Snippet>,
    all: OnceLock<Vec<TermSet>>,
    multi_letter: OnceLock<Vec<TermSet>>,
}

impl LineTerms {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self {
            snippet,
            all: OnceLock::new(),
            multi_letter: OnceLock::new(),
        }
    }

    /// With `ignore_one_letter`, single-character terms are dropped
    pub fn lines(&self, ignore_one_letter: bool) -> &[TermSet] {
        let all = self.all.get_or_init(|| line_identifier_terms(self.snippet.code()));
        if !ignore_one_letter {
            return all;
        }
        self.multi_letter.get_or_init(|| {
            all.iter()
                .map(|terms| terms.iter().filter(|t| t.chars().count() > 1).cloned().collect())
                .collect()
        })
    }
}

pub struct DictionaryFeature {
    terms: Arc<LineTerms>,
    lexicon: SharedLexicon,
    metric: DictionaryMetric,
    aggregation: Aggregation,
    ignore_one_letter: bool,
}

impl DictionaryFeature {
    fn line_value(&self, terms: &TermSet) -> f64 {
        let mut value = 0.0;
        for term in terms.iter().filter(|term| !is_integer(term)) {
            let Some((pos, word)) = self.lexicon.best_pos(term) else {
                continue;
            };
            value += match self.metric {
                DictionaryMetric::TermsInDictionary => 1.0,
                DictionaryMetric::NumberOfMeanings => self.lexicon.sense_count(&word, pos) as f64,
                DictionaryMetric::NarrowMeaning => self.lexicon.hypernym_distance(&word, pos),
            };
        }
        if self.metric == DictionaryMetric::TermsInDictionary {
            value /= terms.len() as f64;
        }
        value
    }
}

impl FeatureCalculator for DictionaryFeature {
    fn name(&self) -> String {
        let suffix = if self.ignore_one_letter { " (Ignore 1-letter word)" } else { "" };
        format!("{} {}{}", self.metric.name(), self.aggregation, suffix)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let values: Vec<f64> = self
            .terms
            .lines(self.ignore_one_letter)
            .iter()
            .filter(|terms| !terms.is_empty())
            .map(|terms| self.line_value(terms))
            .collect();
        Ok(self.aggregation.apply(&values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{MemoryLexicon, NullLexicon, Pos, Relation};
    use crate::metrics::test_support::{assert_close, snippet};
    use rustc_hash::FxHashMap;

    const CODE: &str = "int totalCount = x;\nreturn count;\n}\n";

    fn lexicon() -> SharedLexicon {
        let mut lexicon = MemoryLexicon::new();
        let sum = lexicon.add(Pos::Noun, &["sum"]);
        let total = lexicon.add(Pos::Noun, &["total"]);
        lexicon.relate(total, Relation::Hypernym, sum);

        let abstraction = lexicon.add(Pos::Noun, &["abstraction"]);
        let number = lexicon.add(Pos::Noun, &["number"]);
        let count = lexicon.add(Pos::Noun, &["count", "tally"]);
        lexicon.relate(number, Relation::Hypernym, abstraction);
        lexicon.relate(count, Relation::Hypernym, number);
        lexicon.add(Pos::Noun, &["count", "numeration"]);
        lexicon.add(Pos::Verb, &["count", "number"]);
        Arc::new(lexicon)
    }

    fn values(lexicon: SharedLexicon) -> FxHashMap<String, f64> {
        calculators(&snippet(CODE), &lexicon)
            .iter()
            .map(|c| (c.name(), c.calculate_metric().unwrap()))
            .collect()
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = calculators(&snippet(CODE), &lexicon())
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names.len(), 14);
        assert_eq!(names[0], "Identifier Terms in Dictionary MIN");
        assert_eq!(names[3], "Number of Meanings MAX");
        assert_eq!(names[6], "Narrow Meaning Identifiers MAX");
        assert_eq!(names[7], "Identifier Terms in Dictionary MIN (Ignore 1-letter word)");
        assert_eq!(names[13], "Narrow Meaning Identifiers MAX (Ignore 1-letter word)");
    }

    #[test]
    fn test_dictionary_features() {
        // lines: {total, count, x} and {count}
        let values = values(lexicon());
        assert_close(values["Identifier Terms in Dictionary MIN"], 2.0 / 3.0);
        assert_close(values["Identifier Terms in Dictionary AVG"], 5.0 / 6.0);
        assert_close(values["Number of Meanings AVG"], 2.5);
        assert_close(values["Number of Meanings MAX"], 3.0);
        assert_close(values["Narrow Meaning Identifiers MIN"], 2.0);
        assert_close(values["Narrow Meaning Identifiers AVG"], 2.5);
        assert_close(values["Narrow Meaning Identifiers MAX"], 3.0);
    }

    #[test]
    fn test_one_letter_terms_ignored() {
        let values = values(lexicon());
        assert_close(values["Identifier Terms in Dictionary MIN (Ignore 1-letter word)"], 1.0);
        assert_close(values["Identifier Terms in Dictionary AVG (Ignore 1-letter word)"], 1.0);
        assert_close(values["Number of Meanings MAX (Ignore 1-letter word)"], 3.0);
    }

    #[test]
    fn test_unknown_words() {
        let values = values(Arc::new(NullLexicon));
        assert_eq!(values["Identifier Terms in Dictionary AVG"], 0.0);
        assert_eq!(values["Narrow Meaning Identifiers MAX"], 0.0);
    }

    #[test]
    fn test_no_terms() {
        let lexicon = lexicon();
        for calculator in calculators(&snippet("{}\n"), &lexicon) {
            assert_eq!(calculator.calculate_metric().unwrap(), 0.0);
        }
    }
}
