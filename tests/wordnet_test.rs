//! WordNet lookups against the small database in tests/fixtures/wordnet

use cpp_readability::lexicon::{Lexicon, Pos, WordNet};
use std::path::PathBuf;

fn wordnet() -> WordNet {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/wordnet");
    WordNet::open(&root).expect("Failed to open fixture WordNet")
}

#[test]
fn test_open_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(WordNet::open(dir.path().join("nowhere")).is_err());
}

#[test]
fn test_best_pos() {
    let wn = wordnet();
    assert_eq!(wn.best_pos("_must_"), Some((Pos::Noun, "must".to_string())));
    assert_eq!(wn.best_pos("dogs").map(|(pos, _)| pos), Some(Pos::Noun));
    assert_eq!(wn.best_pos("mice").map(|(pos, _)| pos), Some(Pos::Noun));
    assert_eq!(wn.best_pos("testing").map(|(pos, _)| pos), Some(Pos::Verb));
    assert_eq!(wn.best_pos("zebra"), None);
}

#[test]
fn test_best_pos_ties_go_to_first_part_of_speech() {
    let wn = wordnet();
    assert_eq!(wn.best_pos("test").map(|(pos, _)| pos), Some(Pos::Noun));
    assert_eq!(wn.best_pos("equal").map(|(pos, _)| pos), Some(Pos::Verb));
    assert_eq!(wn.best_pos("big").map(|(pos, _)| pos), Some(Pos::Adj));
}

#[test]
fn test_sense_count() {
    let wn = wordnet();
    assert_eq!(wn.sense_count("dog", Pos::Noun), 1);
    assert_eq!(wn.sense_count("be", Pos::Verb), 2);
    assert_eq!(wn.sense_count("was", Pos::Verb), 2);
    assert_eq!(wn.sense_count("big", Pos::AdjSat), 2);
    assert_eq!(wn.sense_count("zebra", Pos::Noun), 0);
}

#[test]
fn test_synonyms() {
    let wn = wordnet();
    assert_eq!(
        wn.synonyms("dog"),
        vec![
            "Canis_familiaris",
            "animal",
            "animate_being",
            "beast",
            "cat",
            "domestic_dog",
            "mouse",
            "true_cat"
        ]
    );
    assert_eq!(wn.synonyms("big"), vec!["bad", "large"]);
    assert!(wn.synonyms("zebra").is_empty());
}

#[test]
fn test_hypernym_distance() {
    let wn = wordnet();
    assert_eq!(wn.hypernym_distance("dog", Pos::Noun), 5.0);
    assert_eq!(wn.hypernym_distance("animal", Pos::Noun), 4.0);
    assert_eq!(wn.hypernym_distance("Monday", Pos::Noun), 2.0);
    assert_eq!(wn.hypernym_distance("equal", Pos::Verb), 1.0);
    assert_eq!(wn.hypernym_distance("run", Pos::Verb), 0.0);
    assert_eq!(wn.hypernym_distance("zebra", Pos::Noun), -1.0);
}
