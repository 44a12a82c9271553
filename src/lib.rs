//! C++ readability feature extraction
//!
//! Turns a C++ snippet into a name-keyed vector of readability features and
//! feeds selected features to a trained classifier:
//!
//! - [`lexer`]: tree-sitter tokenizer plus composable token-view adapters
//! - [`analyzer`]: heuristic comment and literal scanning
//! - [`text`] and [`lexicon`]: term extraction, stemming and WordNet lookups
//! - [`metrics`]: the feature families
//! - [`registry`]: every feature of a snippet in a stable order
//! - [`classifier`]: logistic readability model

pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod lexer;
pub mod lexicon;
pub mod metrics;
pub mod registry;
pub mod text;

pub use classifier::{LogisticModel, Prediction, ReadabilityCalculator, ReadabilityModel};
pub use config::ReadabilityConfig;
pub use error::{FeatureError, FeatureResult};
pub use metrics::{FeatureCalculator, Snippet};
pub use registry::FeatureRegistry;
