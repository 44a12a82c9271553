//! Lexical knowledge base used by the textual metrics
//!
//! Backends only need to answer two questions: which synsets a lemma has, and
//! what a given synset contains. Everything the metrics ask for (best part of
//! speech, synonyms, hypernym depth, sense counts) is derived from those in the
//! provided methods of [`Lexicon`].

pub mod memory;
pub mod wordnet;

pub use memory::MemoryLexicon;
pub use wordnet::WordNet;

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Part of speech of a synset. Satellite adjectives are stored with the
/// adjectives and looked up through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    AdjSat,
    Adv,
}

impl Pos {
    /// Lookup order used when no part of speech is requested
    pub const LOOKUP_ORDER: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "n" => Some(Pos::Noun),
            "v" => Some(Pos::Verb),
            "a" => Some(Pos::Adj),
            "s" => Some(Pos::AdjSat),
            "r" => Some(Pos::Adv),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Pos::Noun => "n",
            Pos::Verb => "v",
            Pos::Adj => "a",
            Pos::AdjSat => "s",
            Pos::Adv => "r",
        }
    }

    /// The part of speech whose files hold this one's synsets
    pub fn storage(self) -> Pos {
        match self {
            Pos::AdjSat => Pos::Adj,
            other => other,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Location of a synset: storage part of speech plus offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u64,
}

impl SynsetId {
    pub fn new(pos: Pos, offset: u64) -> Self {
        Self {
            pos: pos.storage(),
            offset,
        }
    }
}

/// Semantic relations followed by the metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Hypernym,
    InstanceHypernym,
    Hyponym,
    SimilarTo,
    AlsoSee,
}

impl Relation {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "@" => Some(Relation::Hypernym),
            "@i" => Some(Relation::InstanceHypernym),
            "~" => Some(Relation::Hyponym),
            "&" => Some(Relation::SimilarTo),
            "^" => Some(Relation::AlsoSee),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synset {
    pub id: SynsetId,
    /// Actual part of speech, which distinguishes satellite adjectives
    pub pos: Pos,
    pub lemmas: Vec<String>,
    pub pointers: Vec<(Relation, SynsetId)>,
}

impl Synset {
    pub fn related(&self, relation: Relation) -> impl Iterator<Item = SynsetId> + '_ {
        self.pointers
            .iter()
            .filter(move |(r, _)| *r == relation)
            .map(|(_, id)| *id)
    }
}

/// A lexical database
pub trait Lexicon: Send + Sync {
    /// Synsets of `lemma` in database order. `None` searches nouns, verbs,
    /// adjectives and adverbs in that order.
    fn synsets(&self, lemma: &str, pos: Option<Pos>) -> Vec<Synset>;

    /// Synset stored at `id`
    fn synset(&self, id: SynsetId) -> Option<Synset>;

    /// Whether the database has any content
    fn is_empty(&self) -> bool {
        false
    }

    /// Part of speech with the most senses, plus the normalized word that found it.
    ///
    /// The word is tried trimmed and lower-cased, then with non-letters cut from
    /// both ends. Ties go to the part of speech seen first.
    fn best_pos(&self, word: &str) -> Option<(Pos, String)> {
        let mut normalized = word.trim().to_lowercase();
        let mut synsets = self.synsets(&normalized, None);
        if synsets.is_empty() {
            normalized = trim_non_letters(word).to_lowercase();
            synsets = self.synsets(&normalized, None);
        }

        let mut counts: Vec<(Pos, usize)> = Vec::new();
        for synset in &synsets {
            match counts.iter_mut().find(|(pos, _)| *pos == synset.pos) {
                Some((_, count)) => *count += 1,
                None => counts.push((synset.pos, 1)),
            }
        }

        let mut best: Option<(Pos, usize)> = None;
        for (pos, count) in counts {
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((pos, count));
            }
        }
        best.map(|(pos, _)| (pos, normalized))
    }

    /// Synonyms from the first sense of the best part of speech: its lemmas and
    /// those of its hypernyms, similar synsets, also-see synsets and the
    /// hyponyms of its hypernyms. `word` itself is excluded.
    fn synonyms(&self, word: &str) -> Vec<String> {
        let Some((pos, normalized)) = self.best_pos(word) else {
            return Vec::new();
        };
        let Some(first) = self.synsets(&normalized, Some(pos)).into_iter().next() else {
            return Vec::new();
        };

        let hypernyms: Vec<Synset> = first
            .related(Relation::Hypernym)
            .filter_map(|id| self.synset(id))
            .collect();

        let mut related = vec![first.clone()];
        related.extend(hypernyms.iter().cloned());
        for relation in [Relation::SimilarTo, Relation::AlsoSee] {
            related.extend(first.related(relation).filter_map(|id| self.synset(id)));
        }
        for hypernym in &hypernyms {
            related.extend(hypernym.related(Relation::Hyponym).filter_map(|id| self.synset(id)));
        }

        related
            .iter()
            .flat_map(|synset| synset.lemmas.iter())
            .filter(|lemma| lemma.as_str() != word)
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Length of the shortest hypernym path from the first sense of `word` to
    /// its first root hypernym, or -1 when the word has no sense for `pos`
    fn hypernym_distance(&self, word: &str, pos: Pos) -> f64 {
        let Some(first) = self.synsets(&word.trim().to_lowercase(), Some(pos)).into_iter().next() else {
            return -1.0;
        };
        let Some(root) = root_hypernyms(self, &first).into_iter().next() else {
            return 0.0;
        };
        hypernym_depth(self, &first, root).map_or(0.0, |d| d as f64)
    }

    fn sense_count(&self, word: &str, pos: Pos) -> usize {
        self.synsets(&word.trim().to_lowercase(), Some(pos)).len()
    }
}

impl<L: Lexicon + ?Sized> Lexicon for Arc<L> {
    fn synsets(&self, lemma: &str, pos: Option<Pos>) -> Vec<Synset> {
        (**self).synsets(lemma, pos)
    }

    fn synset(&self, id: SynsetId) -> Option<Synset> {
        (**self).synset(id)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

pub type SharedLexicon = Arc<dyn Lexicon>;

/// A lexicon with no entries. Every word is unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLexicon;

impl Lexicon for NullLexicon {
    fn synsets(&self, _lemma: &str, _pos: Option<Pos>) -> Vec<Synset> {
        Vec::new()
    }

    fn synset(&self, _id: SynsetId) -> Option<Synset> {
        None
    }

    fn is_empty(&self) -> bool {
        true
    }
}

fn upward(synset: &Synset) -> impl Iterator<Item = SynsetId> + '_ {
    synset
        .related(Relation::Hypernym)
        .chain(synset.related(Relation::InstanceHypernym))
}

/// Synsets without hypernyms reachable from `start`, depth first
fn root_hypernyms<L: Lexicon + ?Sized>(lexicon: &L, start: &Synset) -> Vec<SynsetId> {
    let mut roots = Vec::new();
    let mut seen = BTreeSet::new();
    let mut todo = vec![start.id];

    while let Some(id) = todo.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(synset) = lexicon.synset(id) else {
            continue;
        };
        let parents: Vec<SynsetId> = upward(&synset).collect();
        if parents.is_empty() {
            roots.push(id);
        } else {
            todo.extend(parents);
        }
    }
    roots
}

/// Breadth-first distance from `start` up to `target`
fn hypernym_depth<L: Lexicon + ?Sized>(lexicon: &L, start: &Synset, target: SynsetId) -> Option<usize> {
    let mut seen = BTreeSet::new();
    let mut queue = VecDeque::from([(start.id, 0usize)]);

    while let Some((id, depth)) = queue.pop_front() {
        if id == target {
            return Some(depth);
        }
        if !seen.insert(id) {
            continue;
        }
        if let Some(synset) = lexicon.synset(id) {
            queue.extend(upward(&synset).map(|parent| (parent, depth + 1)));
        }
    }
    None
}

/// Cut leading and trailing non-letters; a word without letters is kept as is
fn trim_non_letters(word: &str) -> &str {
    let Some(start) = word.char_indices().find(|(_, c)| c.is_alphabetic()).map(|(i, _)| i) else {
        return word;
    };
    let end = word
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_alphabetic())
        .map_or(word.len(), |(i, c)| i + c.len_utf8());
    &word[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> MemoryLexicon {
        let mut lexicon = MemoryLexicon::new();
        let entity = lexicon.add(Pos::Noun, &["entity"]);
        let animal = lexicon.add(Pos::Noun, &["animal", "beast"]);
        let dog = lexicon.add(Pos::Noun, &["dog", "domestic_dog"]);
        let cat = lexicon.add(Pos::Noun, &["cat"]);
        let pup = lexicon.add(Pos::Noun, &["pup", "dog"]);
        let chase = lexicon.add(Pos::Verb, &["chase", "dog"]);
        lexicon.relate(animal, Relation::Hypernym, entity);
        for child in [dog, cat] {
            lexicon.relate(child, Relation::Hypernym, animal);
            lexicon.relate(animal, Relation::Hyponym, child);
        }
        lexicon.relate(pup, Relation::Hypernym, dog);
        let _ = chase;
        lexicon
    }

    #[test]
    fn test_best_pos_prefers_most_senses() {
        let lexicon = animals();
        assert_eq!(lexicon.best_pos("Dog "), Some((Pos::Noun, "dog".to_string())));
        assert_eq!(lexicon.best_pos("chase"), Some((Pos::Verb, "chase".to_string())));
        assert_eq!(lexicon.best_pos("zebra"), None);
    }

    #[test]
    fn test_best_pos_trims_non_letters() {
        let lexicon = animals();
        assert_eq!(lexicon.best_pos("_cat_"), Some((Pos::Noun, "cat".to_string())));
    }

    #[test]
    fn test_synonyms() {
        let lexicon = animals();
        assert_eq!(
            lexicon.synonyms("dog"),
            vec!["animal", "beast", "cat", "domestic_dog"]
        );
        assert!(lexicon.synonyms("zebra").is_empty());
    }

    #[test]
    fn test_hypernym_distance() {
        let lexicon = animals();
        assert_eq!(lexicon.hypernym_distance("dog", Pos::Noun), 2.0);
        assert_eq!(lexicon.hypernym_distance("entity", Pos::Noun), 0.0);
        assert_eq!(lexicon.hypernym_distance("zebra", Pos::Noun), -1.0);
        assert_eq!(lexicon.hypernym_distance("chase", Pos::Verb), 0.0);
    }

    #[test]
    fn test_sense_count() {
        let lexicon = animals();
        assert_eq!(lexicon.sense_count("dog", Pos::Noun), 2);
        assert_eq!(lexicon.sense_count("dog", Pos::Verb), 1);
        assert_eq!(lexicon.sense_count("dog", Pos::Adv), 0);
    }

    #[test]
    fn test_null_lexicon_knows_nothing() {
        let lexicon = NullLexicon;
        assert!(lexicon.is_empty());
        assert_eq!(lexicon.best_pos("dog"), None);
        assert_eq!(lexicon.hypernym_distance("dog", Pos::Noun), -1.0);
    }

    #[test]
    fn test_trim_non_letters() {
        assert_eq!(trim_non_letters("_must_"), "must");
        assert_eq!(trim_non_letters("42"), "42");
        assert_eq!(trim_non_letters("x1"), "x");
    }
}
