//! Name-keyed collection of every readability feature for one snippet
//!
//! Families are registered in a fixed order (Buse-Weimer, Dorn, Posnett,
//! dictionary features, comment consistency, comment readability, number of
//! concepts, text coherence) so feature vectors line up across snippets.

use crate::config::ReadabilityConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::lexer::{CppLexer, SharedLexer};
use crate::lexicon::{NullLexicon, SharedLexicon};
use crate::metrics::{
    buse_weimer, cic, cr, dorn, itid, noc, posnett, tc, BoxedCalculator, FeatureCalculator, Snippet,
};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::debug;

pub struct FeatureRegistry {
    calculators: IndexMap<String, BoxedCalculator>,
}

impl FeatureRegistry {
    pub fn new(snippet: Arc<Snippet>, lexicon: &SharedLexicon, config: &ReadabilityConfig) -> Self {
        let families: [Vec<BoxedCalculator>; 8] = [
            buse_weimer::calculators(&snippet),
            dorn::calculators(&snippet),
            posnett::calculators(&snippet),
            itid::calculators(&snippet, lexicon),
            cic::calculators(&snippet, lexicon),
            cr::calculators(&snippet),
            noc::calculators(&snippet, &config.noc),
            tc::calculators(&snippet, &config.tc),
        ];

        let mut calculators = IndexMap::new();
        for calculator in families.into_iter().flatten() {
            let name = calculator.name();
            debug_assert!(!calculators.contains_key(&name), "duplicate feature {name}");
            calculators.insert(name, calculator);
        }
        Self { calculators }
    }

    /// Registry over `code`, tabs expanded per `config`
    pub fn for_code(code: &str, lexer: SharedLexer, lexicon: &SharedLexicon, config: &ReadabilityConfig) -> Self {
        let snippet = Arc::new(Snippet::with_tab_size(code, lexer, config.tab_size));
        Self::new(snippet, lexicon, config)
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.calculators.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&dyn FeatureCalculator> {
        self.calculators.get(name).map(|calculator| calculator.as_ref())
    }

    /// Values of the named features, in the order given
    pub fn compute<S: AsRef<str>>(&self, names: &[S]) -> FeatureResult<Vec<f64>> {
        debug!("Computing {} of {} features", names.len(), self.len());
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name)
                    .ok_or_else(|| FeatureError::UnknownFeature(name.to_string()))?
                    .calculate_metric()
            })
            .collect()
    }

    /// Every feature in registry order
    pub fn compute_all(&self) -> FeatureResult<IndexMap<String, f64>> {
        debug!("Computing all {} features", self.len());
        self.calculators
            .iter()
            .map(|(name, calculator)| Ok((name.clone(), calculator.calculate_metric()?)))
            .collect()
    }
}

/// Names of every feature in registry order
pub fn feature_names(config: &ReadabilityConfig) -> Vec<String> {
    let lexer: SharedLexer = Arc::new(CppLexer::new());
    let lexicon: SharedLexicon = Arc::new(NullLexicon);
    FeatureRegistry::for_code("", lexer, &lexicon, config)
        .names()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::lexer;

    const CODE: &str = "int main() {
    // count the values
    int total = 0;
    for (int i = 0; i < 10; i++) {
        total += i;
    }
    return total;
}
";

    fn registry(code: &str) -> FeatureRegistry {
        let lexicon: SharedLexicon = Arc::new(NullLexicon);
        FeatureRegistry::for_code(code, lexer(), &lexicon, &ReadabilityConfig::default())
    }

    #[test]
    fn test_family_order() {
        let names = feature_names(&ReadabilityConfig::default());
        assert_eq!(names.len(), 109);
        assert_eq!(names[0], "BW AVG blank lines");
        assert_eq!(names[25], "Dorn align blocks");
        assert_eq!(names[84], "Posnett lines");
        assert_eq!(names[87], "Identifier Terms in Dictionary MIN");
        assert_eq!(names[101], "Comments and Identifiers Consistency");
        assert_eq!(names[103], "Comments Readability");
        assert_eq!(names[104], "Standard Number of Concepts");
        assert_eq!(names[108], "Text Coherence MAX");
    }

    #[test]
    fn test_compute_named_features() {
        let registry = registry(CODE);
        let values = registry
            .compute(&["Posnett lines", "BW MAX indentation"])
            .unwrap();
        assert_eq!(values, vec![9.0, 8.0]);
    }

    #[test]
    fn test_unknown_feature() {
        let err = registry(CODE).compute(&["Not a feature"]).unwrap_err();
        assert!(matches!(err, FeatureError::UnknownFeature(name) if name == "Not a feature"));
    }

    #[test]
    fn test_compute_all() {
        let registry = registry(CODE);
        let values = registry.compute_all().unwrap();
        assert_eq!(values.len(), registry.len());
        assert!(values.values().all(|v| v.is_finite()));
        assert_eq!(values.get_index(0).map(|(name, _)| name.as_str()), Some("BW AVG blank lines"));
    }

    #[test]
    fn test_empty_snippet_fails() {
        let err = registry("").compute_all().unwrap_err();
        assert!(matches!(err, FeatureError::EmptySnippet { .. }));
    }
}
