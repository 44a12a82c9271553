//! WordNet reader for the WNdb file layout
//!
//! Reads `index.{noun,verb,adj,adv}`, `data.*` and the `*.exc` exception lists
//! from one directory. Data files stay in memory as text; a synset is parsed
//! from its line only when asked for. Inflected forms are reduced to base forms
//! the way NLTK's `morphy` does: exception list first, then suffix rules applied
//! until some form is in the index.

use super::{Lexicon, Pos, Relation, Synset, SynsetId};
use crate::error::LexiconError;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJ_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

/// Files of one part of speech
#[derive(Debug, Default)]
struct PartFiles {
    index: FxHashMap<String, Vec<u64>>,
    exceptions: FxHashMap<String, Vec<String>>,
    data: String,
    lines: FxHashMap<u64, usize>,
}

#[derive(Debug)]
pub struct WordNet {
    root: PathBuf,
    parts: FxHashMap<Pos, PartFiles>,
}

impl WordNet {
    /// Load a WNdb directory (the one containing `index.noun`)
    pub fn open(root: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let root = root.as_ref().to_path_buf();
        let mut parts = FxHashMap::default();

        for part in Pos::LOOKUP_ORDER {
            let name = file_name(part);
            let index = parse_index(&read(&root.join(format!("index.{name}")))?, name)?;
            let exceptions = read_optional(&root.join(format!("{name}.exc")))
                .map(|text| parse_exceptions(&text))
                .unwrap_or_default();
            let data = read(&root.join(format!("data.{name}")))?;
            let lines = index_lines(&data, name)?;
            parts.insert(
                part,
                PartFiles {
                    index,
                    exceptions,
                    data,
                    lines,
                },
            );
        }

        let lemmas: usize = parts.values().map(|p| p.index.len()).sum();
        let synsets: usize = parts.values().map(|p| p.lines.len()).sum();
        info!(path = %root.display(), lemmas, synsets, "Loaded WordNet");

        Ok(Self { root, parts })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base forms of `form` that the index knows for `part`
    pub fn morphy(&self, form: &str, part: Pos) -> Vec<String> {
        let part = part.storage();
        let Some(files) = self.parts.get(&part) else {
            return Vec::new();
        };
        let known = |forms: Vec<String>| -> Vec<String> {
            let mut seen = FxHashSet::default();
            forms
                .into_iter()
                .filter(|f| files.index.contains_key(f) && seen.insert(f.clone()))
                .collect()
        };

        if let Some(bases) = files.exceptions.get(form) {
            let mut forms = vec![form.to_string()];
            forms.extend(bases.iter().cloned());
            return known(forms);
        }

        let rules = rules(part);
        let mut forms = apply_rules(&[form.to_string()], rules);
        let mut candidates = vec![form.to_string()];
        candidates.extend(forms.iter().cloned());
        let found = known(candidates);
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms, rules);
            let found = known(forms.clone());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    fn parse_synset(&self, id: SynsetId) -> Option<Synset> {
        let files = self.parts.get(&id.pos)?;
        let start = *files.lines.get(&id.offset)?;
        let line = files.data[start..].lines().next()?;
        let synset = parse_data_line(id, line);
        if synset.is_none() {
            debug!(offset = id.offset, pos = %id.pos, "skipping malformed WordNet data line");
        }
        synset
    }
}

impl Lexicon for WordNet {
    fn synsets(&self, lemma: &str, pos: Option<Pos>) -> Vec<Synset> {
        let lemma = lemma.to_lowercase();
        let parts: Vec<Pos> = match pos {
            Some(pos) => vec![pos.storage()],
            None => Pos::LOOKUP_ORDER.to_vec(),
        };

        let mut synsets = Vec::new();
        for part in parts {
            let Some(files) = self.parts.get(&part) else {
                continue;
            };
            for form in self.morphy(&lemma, part) {
                for &offset in files.index.get(&form).into_iter().flatten() {
                    if let Some(synset) = self.parse_synset(SynsetId::new(part, offset)) {
                        synsets.push(synset);
                    }
                }
            }
        }
        synsets
    }

    fn synset(&self, id: SynsetId) -> Option<Synset> {
        self.parse_synset(id)
    }

    fn is_empty(&self) -> bool {
        self.parts.values().all(|p| p.index.is_empty())
    }
}

fn file_name(part: Pos) -> &'static str {
    match part {
        Pos::Noun => "noun",
        Pos::Verb => "verb",
        Pos::Adj | Pos::AdjSat => "adj",
        Pos::Adv => "adv",
    }
}

fn rules(part: Pos) -> &'static [(&'static str, &'static str)] {
    match part {
        Pos::Noun => NOUN_RULES,
        Pos::Verb => VERB_RULES,
        Pos::Adj | Pos::AdjSat => ADJ_RULES,
        Pos::Adv => &[],
    }
}

/// One round of suffix substitution over every form, without repeats
fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut next = Vec::new();
    for form in forms {
        for (old, new) in rules {
            if let Some(stem) = form.strip_suffix(old) {
                let candidate = format!("{stem}{new}");
                if seen.insert(candidate.clone()) {
                    next.push(candidate);
                }
            }
        }
    }
    next
}

fn read(path: &Path) -> Result<String, LexiconError> {
    fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no WordNet exception list");
            None
        }
    }
}

fn is_header(line: &str) -> bool {
    line.starts_with("  ") || line.trim().is_empty()
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt synset_offset...`
fn parse_index(text: &str, name: &str) -> Result<FxHashMap<String, Vec<u64>>, LexiconError> {
    let malformed = |line: &str| LexiconError::Malformed {
        file: format!("index.{name}"),
        line: line.to_string(),
    };

    let mut index = FxHashMap::default();
    for line in text.lines().filter(|l| !is_header(l)) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(malformed(line));
        }
        let count: usize = fields[2].parse().map_err(|_| malformed(line))?;
        let pointer_kinds: usize = fields[3].parse().map_err(|_| malformed(line))?;
        if fields.len() != 6 + pointer_kinds + count {
            return Err(malformed(line));
        }
        let offsets = fields[fields.len() - count..]
            .iter()
            .map(|f| f.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed(line))?;
        index.insert(fields[0].to_string(), offsets);
    }
    Ok(index)
}

/// `inflected base [base...]` per line
fn parse_exceptions(text: &str) -> FxHashMap<String, Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let inflected = fields.next()?;
            Some((inflected.to_string(), fields.map(str::to_string).collect()))
        })
        .collect()
}

/// Map each synset offset to the byte where its line starts
fn index_lines(data: &str, name: &str) -> Result<FxHashMap<u64, usize>, LexiconError> {
    let mut lines = FxHashMap::default();
    let mut start = 0;
    for line in data.split_inclusive('\n') {
        if !is_header(line) {
            let offset = line
                .split_whitespace()
                .next()
                .and_then(|f| f.parse::<u64>().ok())
                .ok_or_else(|| LexiconError::Malformed {
                    file: format!("data.{name}"),
                    line: line.trim_end().to_string(),
                })?;
            lines.insert(offset, start);
        }
        start += line.len();
    }
    Ok(lines)
}

/// `offset lex_filenum ss_type w_cnt word lex_id [...] p_cnt [ptr...] | gloss`
fn parse_data_line(id: SynsetId, line: &str) -> Option<Synset> {
    let fields: Vec<&str> = line.split('|').next()?.split_whitespace().collect();
    let pos = Pos::from_code(fields.get(2)?)?;
    let word_count = usize::from_str_radix(fields.get(3)?, 16).ok()?;

    let mut lemmas = Vec::with_capacity(word_count);
    for i in 0..word_count {
        lemmas.push(strip_marker(fields.get(4 + 2 * i)?).to_string());
    }

    let pointer_at = 4 + 2 * word_count;
    let pointer_count: usize = fields.get(pointer_at)?.parse().ok()?;
    let mut pointers = Vec::new();
    for i in 0..pointer_count {
        let base = pointer_at + 1 + 4 * i;
        let symbol = fields.get(base)?;
        let offset: u64 = fields.get(base + 1)?.parse().ok()?;
        let target = Pos::from_code(fields.get(base + 2)?)?;
        let semantic = *fields.get(base + 3)? == "0000";
        if let (true, Some(relation)) = (semantic, Relation::from_symbol(symbol)) {
            pointers.push((relation, SynsetId::new(target, offset)));
        }
    }

    Some(Synset {
        id,
        pos,
        lemmas,
        pointers,
    })
}

/// Drop adjective position markers such as `(a)` or `(ip)`
fn strip_marker(lemma: &str) -> &str {
    match lemma.find('(') {
        Some(open) if lemma.ends_with(')') => &lemma[..open],
        _ => lemma,
    }
}
