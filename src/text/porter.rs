//! Porter stemmer with the NLTK extensions
//!
//! Porter (1980) plus the departures NLTK's `PorterStemmer` makes by default:
//! a table of irregular forms, words of two letters or fewer left alone, `y`
//! turned into `i` only after a consonant, `alli` reduced before the rest of
//! step 2, and the extra `fulli` and `logi` rules.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

type Condition = fn(&[char]) -> bool;

lazy_static! {
    static ref IRREGULAR_FORMS: FxHashMap<&'static str, &'static str> = [
        ("sky", "sky"),
        ("skies", "sky"),
        ("dying", "die"),
        ("lying", "lie"),
        ("tying", "tie"),
        ("news", "news"),
        ("innings", "inning"),
        ("inning", "inning"),
        ("outings", "outing"),
        ("outing", "outing"),
        ("cannings", "canning"),
        ("canning", "canning"),
        ("howe", "howe"),
        ("proceed", "proceed"),
        ("exceed", "exceed"),
        ("succeed", "succeed"),
    ]
    .into_iter()
    .collect();
}

const STEP1A: &[(&str, &str, Condition)] = &[
    ("sses", "ss", always),
    ("ies", "i", always),
    ("ss", "ss", always),
    ("s", "", always),
];

const STEP2: &[(&str, &str, Condition)] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
    // the `l` stays with the stem so `geologi` and `theologi` reduce alike
    ("logi", "log", positive_measure_with_l),
];

const STEP3: &[(&str, &str, Condition)] = &[
    ("icate", "ic", positive_measure),
    ("ative", "", positive_measure),
    ("alize", "al", positive_measure),
    ("iciti", "ic", positive_measure),
    ("ical", "ic", positive_measure),
    ("ful", "", positive_measure),
    ("ness", "", positive_measure),
];

const STEP4: &[(&str, &str, Condition)] = &[
    ("al", "", measure_above_one),
    ("ance", "", measure_above_one),
    ("ence", "", measure_above_one),
    ("er", "", measure_above_one),
    ("ic", "", measure_above_one),
    ("able", "", measure_above_one),
    ("ible", "", measure_above_one),
    ("ant", "", measure_above_one),
    ("ement", "", measure_above_one),
    ("ment", "", measure_above_one),
    ("ent", "", measure_above_one),
    ("ion", "", ion_stem),
    ("ou", "", measure_above_one),
    ("ism", "", measure_above_one),
    ("ate", "", measure_above_one),
    ("iti", "", measure_above_one),
    ("ous", "", measure_above_one),
    ("ive", "", measure_above_one),
    ("ize", "", measure_above_one),
];

/// Porter stem of `word`, lower-cased
pub fn stem(word: &str) -> String {
    let word = word.to_lowercase();
    if let Some(form) = IRREGULAR_FORMS.get(word.as_str()) {
        return form.to_string();
    }
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 2 {
        return word;
    }

    let chars = step1a(chars);
    let chars = step1b(chars);
    let chars = step1c(chars);
    let chars = step2(chars);
    let chars = apply_rules(chars, STEP3);
    let chars = apply_rules(chars, STEP4);
    let chars = step5a(chars);
    step5b(chars).into_iter().collect()
}

fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// `m` in the `[C](VC){m}[V]` form of `stem`
fn measure(stem: &[char]) -> usize {
    let mut m = 0;
    let mut after_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && after_vowel {
            m += 1;
        }
        after_vowel = !consonant;
    }
    m
}

fn always(_stem: &[char]) -> bool {
    true
}

fn positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn positive_measure_with_l(stem: &[char]) -> bool {
    let mut with_l = stem.to_vec();
    with_l.push('l');
    measure(&with_l) > 0
}

fn ion_stem(stem: &[char]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some('s' | 't'))
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant-vowel-consonant ending whose last letter is not `w`, `x` or `y`;
/// two-letter words count when they are vowel-consonant
fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    let long = n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], 'w' | 'x' | 'y');
    let short = n == 2 && !is_consonant(word, 0) && is_consonant(word, 1);
    long || short
}

fn ends_with(word: &[char], suffix: &str) -> bool {
    word.len() >= suffix.len() && word[word.len() - suffix.len()..].iter().copied().eq(suffix.chars())
}

fn replace_suffix(word: &[char], suffix: &str, replacement: &str) -> Vec<char> {
    let mut out = word[..word.len() - suffix.len()].to_vec();
    out.extend(replacement.chars());
    out
}

/// The first rule whose suffix matches decides; a failed condition leaves the word alone
fn apply_rules(word: Vec<char>, rules: &[(&str, &str, Condition)]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if ends_with(&word, suffix) {
            if condition(&word[..word.len() - suffix.len()]) {
                return replace_suffix(&word, suffix, replacement);
            }
            return word;
        }
    }
    word
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 && ends_with(&word, "ies") {
        return replace_suffix(&word, "ies", "ie");
    }
    apply_rules(word, STEP1A)
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return replace_suffix(&word, "ied", replacement);
    }
    if ends_with(&word, "eed") {
        if positive_measure(&word[..word.len() - 3]) {
            return replace_suffix(&word, "eed", "ee");
        }
        return word;
    }

    let Some(stem) = ["ed", "ing"].iter().find_map(|suffix| {
        ends_with(&word, suffix)
            .then(|| word[..word.len() - suffix.len()].to_vec())
            .filter(|stem| contains_vowel(stem))
    }) else {
        return word;
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if ends_with(&stem, suffix) {
            return replace_suffix(&stem, suffix, replacement);
        }
    }
    if ends_double_consonant(&stem) {
        if matches!(stem.last(), Some('l' | 's' | 'z')) {
            return stem;
        }
        return stem[..stem.len() - 1].to_vec();
    }
    if measure(&stem) == 1 && ends_cvc(&stem) {
        let mut stem = stem;
        stem.push('e');
        return stem;
    }
    stem
}

fn step1c(word: Vec<char>) -> Vec<char> {
    let n = word.len();
    if n > 2 && word[n - 1] == 'y' && is_consonant(&word, n - 2) {
        return replace_suffix(&word, "y", "i");
    }
    word
}

fn step2(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "alli") && positive_measure(&word[..word.len() - 4]) {
        return step2(replace_suffix(&word, "alli", "al"));
    }
    apply_rules(word, STEP2)
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if !ends_with(&word, "e") {
        return word;
    }
    let stem = &word[..word.len() - 1];
    let m = measure(stem);
    if m > 1 || (m == 1 && !ends_cvc(stem)) {
        return stem.to_vec();
    }
    word
}

fn step5b(word: Vec<char>) -> Vec<char> {
    if ends_with(&word, "ll") && measure(&word[..word.len() - 1]) > 1 {
        return word[..word.len() - 1].to_vec();
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step1() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("ties"), "tie");
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("filing"), "file");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("fairly"), "fairli");
    }

    #[test]
    fn test_suffix_steps() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("generalization"), "gener");
        assert_eq!(stem("generate"), "gener");
        assert_eq!(stem("computation"), "comput");
        assert_eq!(stem("hopefulness"), "hope");
        assert_eq!(stem("adjustment"), "adjust");
        assert_eq!(stem("controll"), "control");
    }

    #[test]
    fn test_define_and_defined_share_a_stem() {
        assert_eq!(stem("define"), "defin");
        assert_eq!(stem("defined"), "defin");
    }

    #[test]
    fn test_irregular_and_short_words() {
        assert_eq!(stem("dying"), "die");
        assert_eq!(stem("skies"), "sky");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("Var"), "var");
    }
}
