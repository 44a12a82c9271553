//! In-memory lexicon built programmatically
//!
//! Useful for tests and for callers that ship a small domain vocabulary instead
//! of a full WordNet install. Lemmas are matched case-insensitively with spaces
//! stored as `_`; there is no morphological reduction.

use super::{Lexicon, Pos, Relation, Synset, SynsetId};
use rustc_hash::FxHashMap;

#[derive(Debug, Default, Clone)]
pub struct MemoryLexicon {
    synsets: FxHashMap<SynsetId, Synset>,
    index: FxHashMap<(String, Pos), Vec<SynsetId>>,
    next_offset: u64,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a synset and index its lemmas. Returns its id.
    pub fn add(&mut self, pos: Pos, lemmas: &[&str]) -> SynsetId {
        let id = SynsetId::new(pos, self.next_offset);
        self.next_offset += 1;

        for lemma in lemmas {
            self.index
                .entry((index_key(lemma), pos.storage()))
                .or_default()
                .push(id);
        }
        self.synsets.insert(
            id,
            Synset {
                id,
                pos,
                lemmas: lemmas.iter().map(|l| l.replace(' ', "_")).collect(),
                pointers: Vec::new(),
            },
        );
        id
    }

    /// Add a one-way pointer from `from` to `to`
    pub fn relate(&mut self, from: SynsetId, relation: Relation, to: SynsetId) {
        if let Some(synset) = self.synsets.get_mut(&from) {
            synset.pointers.push((relation, to));
        }
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }
}

fn index_key(lemma: &str) -> String {
    lemma.trim().to_lowercase().replace(' ', "_")
}

impl Lexicon for MemoryLexicon {
    fn synsets(&self, lemma: &str, pos: Option<Pos>) -> Vec<Synset> {
        let key = index_key(lemma);
        let parts: Vec<Pos> = match pos {
            Some(pos) => vec![pos.storage()],
            None => Pos::LOOKUP_ORDER.to_vec(),
        };
        parts
            .into_iter()
            .filter_map(|part| self.index.get(&(key.clone(), part)))
            .flatten()
            .filter_map(|id| self.synsets.get(id).cloned())
            .collect()
    }

    fn synset(&self, id: SynsetId) -> Option<Synset> {
        self.synsets.get(&id).cloned()
    }

    fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_part_of_speech() {
        let mut lexicon = MemoryLexicon::new();
        let noun = lexicon.add(Pos::Noun, &["Run"]);
        let verb = lexicon.add(Pos::Verb, &["run", "operate"]);
        let satellite = lexicon.add(Pos::AdjSat, &["running"]);

        let all: Vec<SynsetId> = lexicon.synsets("RUN", None).iter().map(|s| s.id).collect();
        assert_eq!(all, vec![noun, verb]);
        assert_eq!(lexicon.synsets("run", Some(Pos::Verb))[0].lemmas, vec!["run", "operate"]);

        // satellites are filed with adjectives
        assert_eq!(lexicon.synsets("running", Some(Pos::Adj))[0].id, satellite);
        assert_eq!(lexicon.synsets("running", Some(Pos::AdjSat))[0].pos, Pos::AdjSat);
        assert_eq!(lexicon.len(), 3);
    }
}
