//! Structural features from Buse and Weimer's readability model
//!
//! Mostly per-line token counts folded with AVG or MAX, computed on the snippet
//! with comments removed. Blank-line and comment ratios, character frequency
//! and word frequency look at the snippet as written.

use super::{Aggregation, BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::delete_comments;
use crate::error::{FeatureError, FeatureResult};
use crate::lexer::{Token, TokenKind};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

const ASSIGNMENTS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^="];
const COMPARISONS: &[&str] = &["==", "!=", ">", ">=", "<", "<="];
const ARITHMETIC: &[&str] = &["+", "-", "*", "/", "%"];
const LOOPS: &[&str] = &["for", "while"];
const OPENERS: &[&str] = &["(", "{"];

/// Every Buse-Weimer feature for `snippet`, in registry order
pub fn calculators(snippet: &Arc<Snippet>) -> Vec<BoxedCalculator> {
    let uncommented = Arc::new(snippet.derive(&delete_comments(snippet.code())));

    let mut calculators: Vec<BoxedCalculator> = vec![
        Box::new(BlankLines::new(snippet.clone())),
        Box::new(CommentLines::new(snippet.clone())),
        Box::new(MaxCharOccurrence::new(snippet.clone())),
        Box::new(MaxWordOccurrence::new(snippet.clone())),
    ];

    for feature in LineFeature::AVG_ONLY {
        calculators.push(Box::new(LineBased::new(
            uncommented.clone(),
            *feature,
            Aggregation::Avg,
        )));
    }

    for feature in LineFeature::AVG_AND_MAX {
        for aggregation in [Aggregation::Avg, Aggregation::Max] {
            let calculator: BoxedCalculator = match feature {
                None => Box::new(IdentifiersLength::new(uncommented.clone(), aggregation)),
                Some(feature) => Box::new(LineBased::new(uncommented.clone(), *feature, aggregation)),
            };
            calculators.push(calculator);
        }
    }

    calculators
}

/// Share of lines that are blank
pub struct BlankLines {
    snippet: Arc<Snippet>,
}

impl BlankLines {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for BlankLines {
    fn name(&self) -> String {
        "BW AVG blank lines".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let lines = self.snippet.lines();
        if lines.is_empty() {
            return Err(FeatureError::EmptySnippet { metric: self.name() });
        }
        let blank = lines.iter().filter(|line| line.trim().is_empty()).count();
        Ok(blank as f64 / lines.len() as f64)
    }
}

/// Share of lines touched by a comment token
pub struct CommentLines {
    snippet: Arc<Snippet>,
}

impl CommentLines {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for CommentLines {
    fn name(&self) -> String {
        "BW AVG comments".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let line_count = self.snippet.lines().len();
        if line_count == 0 {
            return Err(FeatureError::EmptySnippet { metric: self.name() });
        }

        let mut comment_lines = FxHashSet::default();
        for token in self.snippet.tokens()? {
            if token.kind == TokenKind::Comment {
                comment_lines.extend(token.start.line..=token.end.line);
            }
        }
        Ok(comment_lines.len() as f64 / line_count as f64)
    }
}

/// Occurrences of the most frequent character
pub struct MaxCharOccurrence {
    snippet: Arc<Snippet>,
}

impl MaxCharOccurrence {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for MaxCharOccurrence {
    fn name(&self) -> String {
        "BW MAX char".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let mut counts: FxHashMap<char, usize> = FxHashMap::default();
        for c in self.snippet.code().chars() {
            *counts.entry(c).or_insert(0) += 1;
        }
        Ok(counts.values().copied().max().unwrap_or(0) as f64)
    }
}

/// Occurrences of the most frequent whitespace-separated word across token spellings
pub struct MaxWordOccurrence {
    snippet: Arc<Snippet>,
}

impl MaxWordOccurrence {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for MaxWordOccurrence {
    fn name(&self) -> String {
        "BW MAX words".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for token in self.snippet.tokens()? {
            for word in token.value.split_whitespace() {
                *counts.entry(word).or_insert(0) += 1;
            }
        }
        Ok(counts.values().copied().max().unwrap_or(0) as f64)
    }
}

/// Identifier length over all identifier tokens of comment-free code
pub struct IdentifiersLength {
    snippet: Arc<Snippet>,
    aggregation: Aggregation,
}

impl IdentifiersLength {
    /// `snippet` is expected to have its comments removed already
    pub fn new(snippet: Arc<Snippet>, aggregation: Aggregation) -> Self {
        Self { snippet, aggregation }
    }
}

impl FeatureCalculator for IdentifiersLength {
    fn name(&self) -> String {
        format!("BW {} identifiers length", self.aggregation)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let lengths: Vec<f64> = self
            .snippet
            .tokens()?
            .iter()
            .filter(|token| token.kind == TokenKind::Identifier)
            .map(|token| token.value.chars().count() as f64)
            .collect();
        Ok(self.aggregation.apply(&lengths))
    }
}

/// A per-line count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFeature {
    Assignment,
    Commas,
    Comparisons,
    Conditionals,
    Spaces,
    Loops,
    Operators,
    Parenthesis,
    Periods,
    Keywords,
    LineLength,
    NumberOfIdentifiers,
    Numbers,
    Indentation,
}

impl LineFeature {
    const AVG_ONLY: &'static [LineFeature] = &[
        LineFeature::Assignment,
        LineFeature::Commas,
        LineFeature::Comparisons,
        LineFeature::Conditionals,
        LineFeature::Spaces,
        LineFeature::Loops,
        LineFeature::Operators,
        LineFeature::Parenthesis,
        LineFeature::Periods,
    ];

    /// `None` stands for identifier length, which is not a per-line count
    const AVG_AND_MAX: &'static [Option<LineFeature>] = &[
        None,
        Some(LineFeature::Keywords),
        Some(LineFeature::LineLength),
        Some(LineFeature::NumberOfIdentifiers),
        Some(LineFeature::Numbers),
        Some(LineFeature::Indentation),
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            LineFeature::Assignment => "assignment",
            LineFeature::Commas => "commas",
            LineFeature::Comparisons => "comparisons",
            LineFeature::Conditionals => "conditionals",
            LineFeature::Spaces => "spaces",
            LineFeature::Loops => "loops",
            LineFeature::Operators => "operators",
            LineFeature::Parenthesis => "parenthesis",
            LineFeature::Periods => "periods",
            LineFeature::Keywords => "keywords",
            LineFeature::LineLength => "line length",
            LineFeature::NumberOfIdentifiers => "number of identifiers",
            LineFeature::Numbers => "numbers",
            LineFeature::Indentation => "indentation",
        }
    }

    /// Value of this feature for one line and the tokens starting on it
    fn score(self, tokens: &[&Token], line: &str, tab_size: usize) -> f64 {
        match self {
            LineFeature::Assignment => count(tokens, |t| operator_in(t, ASSIGNMENTS)),
            LineFeature::Commas => count(tokens, |t| t.value == ","),
            LineFeature::Comparisons => count(tokens, |t| operator_in(t, COMPARISONS)),
            LineFeature::Conditionals => count(tokens, |t| keyword_in(t, &["if"])),
            LineFeature::Keywords => count(tokens, |t| t.kind == TokenKind::Keyword),
            LineFeature::Loops => count(tokens, |t| keyword_in(t, LOOPS)),
            LineFeature::NumberOfIdentifiers => count(tokens, |t| t.kind == TokenKind::Identifier),
            LineFeature::Numbers => count(tokens, |t| t.kind == TokenKind::Number),
            LineFeature::Operators => count(tokens, |t| operator_in(t, ARITHMETIC)),
            LineFeature::Parenthesis => count(tokens, |t| OPENERS.contains(&t.value.as_str())),
            LineFeature::Periods => count(tokens, |t| t.value == "."),
            LineFeature::Indentation => line
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .map(|c| if c == '\t' { tab_size } else { 1 })
                .sum::<usize>() as f64,
            LineFeature::LineLength => line.trim_matches('\n').chars().count() as f64,
            LineFeature::Spaces => {
                if line.trim().is_empty() {
                    0.0
                } else {
                    line.matches(' ').count() as f64
                }
            }
        }
    }
}

fn count(tokens: &[&Token], predicate: impl Fn(&Token) -> bool) -> f64 {
    tokens.iter().filter(|&&t| predicate(t)).count() as f64
}

fn operator_in(token: &Token, set: &[&str]) -> bool {
    token.kind == TokenKind::Operator && set.contains(&token.value.as_str())
}

fn keyword_in(token: &Token, set: &[&str]) -> bool {
    token.kind == TokenKind::Keyword && set.contains(&token.value.as_str())
}

/// A [`LineFeature`] aggregated over every line; 0 when there are no lines
pub struct LineBased {
    snippet: Arc<Snippet>,
    feature: LineFeature,
    aggregation: Aggregation,
}

impl LineBased {
    /// `snippet` is expected to have its comments removed already
    pub fn new(snippet: Arc<Snippet>, feature: LineFeature, aggregation: Aggregation) -> Self {
        Self {
            snippet,
            feature,
            aggregation,
        }
    }
}

impl FeatureCalculator for LineBased {
    fn name(&self) -> String {
        format!("BW {} {}", self.aggregation, self.feature.suffix())
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let lines = self.snippet.lines();
        let mut per_line: Vec<Vec<&Token>> = vec![Vec::new(); lines.len()];
        for token in self.snippet.tokens()? {
            if let Some(bucket) = token.start.line.checked_sub(1).and_then(|i| per_line.get_mut(i)) {
                bucket.push(token);
            }
        }

        let scores: Vec<f64> = lines
            .iter()
            .zip(&per_line)
            .map(|(line, tokens)| self.feature.score(tokens, line, self.snippet.tab_size()))
            .collect();
        Ok(self.aggregation.apply(&scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{assert_close, snippet};

    const CODE: &str = "int main() {
    /*
    Block comment
    */
    int a = 0;
    int b = 1;
    if (a < b) {
        return foo.bar(a, b);
    }
    while (b < a)
        b = b * 2;
    return b;
}";

    fn value(code: &str, name: &str) -> f64 {
        calculators(&snippet(code))
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| panic!("no feature {name}"))
            .calculate_metric()
            .unwrap()
    }

    #[test]
    fn test_feature_names_in_order() {
        let names: Vec<String> = calculators(&snippet(CODE)).iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), 25);
        assert_eq!(names[0], "BW AVG blank lines");
        assert_eq!(names[3], "BW MAX words");
        assert_eq!(names[4], "BW AVG assignment");
        assert_eq!(names[12], "BW AVG periods");
        assert_eq!(names[13], "BW AVG identifiers length");
        assert_eq!(names[14], "BW MAX identifiers length");
        assert_eq!(names[24], "BW MAX indentation");
    }

    #[test]
    fn test_blank_lines() {
        let code = "void main()\n        {\n            \n            \n            \n        }";
        assert_close(value(code, "BW AVG blank lines"), 0.5);
        assert_close(value(CODE, "BW AVG blank lines"), 0.0);
    }

    #[test]
    fn test_blank_lines_on_empty_snippet() {
        let err = BlankLines::new(snippet("")).calculate_metric().unwrap_err();
        assert!(matches!(err, FeatureError::EmptySnippet { .. }));
        let err = CommentLines::new(snippet("")).calculate_metric().unwrap_err();
        assert!(matches!(err, FeatureError::EmptySnippet { .. }));
    }

    #[test]
    fn test_comment_lines() {
        let code = "int a; // first\n/* one\n   two */\nint b;\n";
        assert_close(value(code, "BW AVG comments"), 3.0 / 4.0);
        assert_close(value(CODE, "BW AVG comments"), 3.0 / 13.0);
    }

    #[test]
    fn test_max_occurrences() {
        assert_close(value(CODE, "BW MAX char"), 75.0);
        assert_close(value(CODE, "BW MAX words"), 7.0);
        let code = "void main()\n{\n    int b = 0;\n    int a = b;\n}";
        assert_close(value(code, "BW MAX words"), 2.0);
    }

    #[test]
    fn test_identifiers_length() {
        let code = "void main()\n        {\n            int b = 0;\n            int a = b;\n        }";
        assert_close(value(code, "BW AVG identifiers length"), 7.0 / 4.0);
        assert_close(value(code, "BW MAX identifiers length"), 4.0);
        assert_close(value(CODE, "BW AVG identifiers length"), 1.5);
    }

    #[test]
    fn test_token_counts_per_line() {
        assert_close(value(CODE, "BW AVG assignment"), 3.0 / 11.0);
        assert_close(value(CODE, "BW AVG commas"), 1.0 / 11.0);
        assert_close(value(CODE, "BW AVG comparisons"), 2.0 / 11.0);
        assert_close(value(CODE, "BW AVG conditionals"), 1.0 / 11.0);
        assert_close(value(CODE, "BW AVG keywords"), 7.0 / 11.0);
        assert_close(value(CODE, "BW MAX keywords"), 1.0);
        assert_close(value(CODE, "BW AVG loops"), 1.0 / 11.0);
        assert_close(value(CODE, "BW AVG number of identifiers"), 14.0 / 11.0);
        assert_close(value(CODE, "BW MAX number of identifiers"), 4.0);
        assert_close(value(CODE, "BW AVG numbers"), 3.0 / 11.0);
        assert_close(value(CODE, "BW AVG operators"), 1.0 / 11.0);
        assert_close(value(CODE, "BW AVG parenthesis"), 6.0 / 11.0);
        assert_close(value(CODE, "BW AVG periods"), 1.0 / 11.0);
    }

    #[test]
    fn test_commented_lines_are_removed_first() {
        let code = "void main()\n{\n    // a = 1, b = 2, c = 3\n    foo(a, b, c);\n}";
        assert_close(value(code, "BW AVG commas"), 2.0 / 4.0);
    }

    #[test]
    fn test_text_shape_per_line() {
        assert_close(value(CODE, "BW AVG line length"), 143.0 / 11.0);
        assert_close(value(CODE, "BW MAX line length"), 29.0);
        assert_close(value(CODE, "BW AVG spaces"), 62.0 / 11.0);
        assert_close(value(CODE, "BW AVG indentation"), 4.0);
        assert_close(value(CODE, "BW MAX indentation"), 8.0);
    }

    #[test]
    fn test_line_features_on_empty_snippet() {
        assert_close(value("", "BW AVG keywords"), 0.0);
        assert_close(value("", "BW MAX line length"), 0.0);
        assert_close(value("", "BW MAX char"), 0.0);
    }
}
