//! End-to-end tests: config file, feature registry, WordNet and model together

use cpp_readability::config::load_config;
use cpp_readability::lexicon::{SharedLexicon, WordNet};
use cpp_readability::{FeatureRegistry, LogisticModel, ReadabilityCalculator, ReadabilityConfig};
use std::path::PathBuf;
use std::sync::Arc;

fn wordnet() -> SharedLexicon {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wordnet");
    Arc::new(WordNet::open(root).expect("Failed to open fixture WordNet"))
}

fn registry(code: &str, config: &ReadabilityConfig) -> FeatureRegistry {
    let lexer = config.language().expect("valid language").lexer();
    FeatureRegistry::for_code(code, lexer, &wordnet(), config)
}

#[test]
fn test_dictionary_features_with_wordnet() {
    let config = ReadabilityConfig::default();
    let values = registry("animal = dog + cat;\n", &config).compute_all().unwrap();

    assert_eq!(values.len(), 109);
    assert_eq!(values["Identifier Terms in Dictionary MIN"], 1.0);
    assert_eq!(values["Number of Meanings AVG"], 3.0);
    // animal 4, dog 5, cat 5
    assert_eq!(values["Narrow Meaning Identifiers MAX"], 14.0);
    assert!(values.values().all(|v| v.is_finite()));
}

#[test]
fn test_config_file_drives_registry() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cpp-readability.toml"),
        "tab_size = 8\n\n[tc]\nthreshold = 2\n",
    )
    .unwrap();
    let config = load_config(None, dir.path());
    assert_eq!(config.tab_size, 8);
    assert_eq!(config.tc.threshold, 2);

    let code = "int main() {\n\treturn 0;\n}\n";
    let values = registry(code, &config)
        .compute(&["BW MAX indentation"])
        .unwrap();
    assert_eq!(values, vec![8.0]);
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "tab_size = \"wide\"\n").unwrap();
    assert_eq!(load_config(Some(path.as_path()), dir.path()), ReadabilityConfig::default());
}

#[test]
fn test_saved_model_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let model = LogisticModel::new(
        vec!["Posnett lines".to_string(), "BW MAX indentation".to_string()],
        vec![1.0, -1.0],
        1.0,
    )
    .unwrap();
    model.save(&path).unwrap();

    let loaded = LogisticModel::load(&path).unwrap();
    assert_eq!(loaded, model);

    let config = ReadabilityConfig::default();
    let language = config.language().unwrap();
    let calculator = ReadabilityCalculator::new(Arc::new(loaded), language, wordnet(), config);
    let prediction = calculator.predict("int main() {\n    return 0;\n}").unwrap();
    assert_eq!(prediction.probability, 0.5);
    assert_eq!(prediction.label, 1);
}
