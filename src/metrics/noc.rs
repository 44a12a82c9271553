//! Number of concepts
//!
//! Each non-blank line becomes a document of stemmed identifier terms. Lines
//! are clustered by term overlap; every cluster is one concept.

use super::{BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::delete_blank_lines;
use crate::cluster::{cluster_count, Clusterer, Dbscan};
use crate::config::NocConfig;
use crate::error::FeatureResult;
use crate::text::{line_identifier_terms, stems, TermSet};
use nalgebra::DMatrix;
use std::sync::Arc;

pub fn calculators(snippet: &Arc<Snippet>, config: &NocConfig) -> Vec<BoxedCalculator> {
    let clusterer: Arc<dyn Clusterer> = Arc::new(Dbscan);
    vec![
        Box::new(NumberOfConcepts {
            snippet: snippet.clone(),
            clusterer: clusterer.clone(),
            eps: config.standard_eps,
            min_samples: config.min_samples,
            normalized: false,
        }),
        Box::new(NumberOfConcepts {
            snippet: snippet.clone(),
            clusterer,
            eps: config.normalized_eps,
            min_samples: config.min_samples,
            normalized: true,
        }),
    ]
}

pub struct NumberOfConcepts {
    snippet: Arc<Snippet>,
    clusterer: Arc<dyn Clusterer>,
    eps: f64,
    min_samples: usize,
    normalized: bool,
}

impl NumberOfConcepts {
    pub fn new(snippet: Arc<Snippet>, eps: f64, min_samples: usize, normalized: bool) -> Self {
        Self {
            snippet,
            clusterer: Arc::new(Dbscan),
            eps,
            min_samples,
            normalized,
        }
    }
}

/// Stemmed term sets of the lines that have any terms
pub fn documents(code: &str) -> Vec<TermSet> {
    line_identifier_terms(&delete_blank_lines(code))
        .iter()
        .filter(|terms| !terms.is_empty())
        .map(|terms| stems(terms))
        .collect()
}

/// Jaccard distance; 1 when both sets are empty
pub fn jaccard_distance(a: &TermSet, b: &TermSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    1.0 - a.intersection(b).count() as f64 / union as f64
}

impl FeatureCalculator for NumberOfConcepts {
    fn name(&self) -> String {
        let kind = if self.normalized { "Normalized" } else { "Standard" };
        format!("{kind} Number of Concepts")
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let documents = documents(self.snippet.code());
        if documents.is_empty() {
            return Ok(0.0);
        }

        let n = documents.len();
        let distances = DMatrix::from_fn(n, n, |i, j| jaccard_distance(&documents[i], &documents[j]));
        let labels = self.clusterer.cluster(&distances, self.eps, self.min_samples);
        let concepts = cluster_count(&labels) as f64;

        Ok(if self.normalized { concepts / n as f64 } else { concepts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{assert_close, snippet};

    const CODE: &str = "int main(int someVar) {
    /*
    'enable' must be true. Otherwise, skip computation.
    Depending on the value of someVar, respective text will be displayed.
    */
    if(enable)
    {
       if (someVar != 0x00)
       {
\t       printf(\"someVar does not equal 0x00\");
       }
       else if (someVar == 0x01)

           printf(\"someVar may equal 0x00\");

       else
       {
          printf(\"someVar is equal 0x00\");
       }
    }
}";

    fn set(words: &[&str]) -> TermSet {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_jaccard_distance() {
        assert_eq!(jaccard_distance(&set(&["a", "b"]), &set(&["a", "b"])), 0.0);
        assert_close(jaccard_distance(&set(&["a", "b"]), &set(&["b", "c"])), 2.0 / 3.0);
        assert_eq!(jaccard_distance(&set(&[]), &set(&[])), 1.0);
    }

    #[test]
    fn test_documents() {
        // the `x` comes from the hex literals once digits are dropped
        let docs = documents(CODE);
        assert_eq!(docs.len(), 7);
        assert_eq!(docs[0], set(&["main", "var"]));
        assert_eq!(docs[2], set(&["var", "x"]));
    }

    #[test]
    fn test_number_of_concepts() {
        let calculators = calculators(&snippet(CODE), &NocConfig::default());
        assert_eq!(calculators[0].name(), "Standard Number of Concepts");
        assert_eq!(calculators[0].calculate_metric().unwrap(), 2.0);
        assert_eq!(calculators[1].name(), "Normalized Number of Concepts");
        assert_close(calculators[1].calculate_metric().unwrap(), 2.0 / 7.0);
    }

    #[test]
    fn test_no_documents() {
        let noc = NumberOfConcepts::new(snippet("{\n}\n"), 0.1, 2, false);
        assert_eq!(noc.calculate_metric().unwrap(), 0.0);
    }

    #[test]
    fn test_distinct_lines_are_noise() {
        let noc = NumberOfConcepts::new(snippet("alpha();\nbeta();\n"), 0.1, 2, false);
        assert_eq!(noc.calculate_metric().unwrap(), 0.0);
    }
}
