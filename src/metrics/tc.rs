//! Text coherence
//!
//! Splits a snippet into blocks (brace blocks spanning several lines, then the
//! bodies of preprocessor conditionals) and measures how much vocabulary the
//! blocks share: the cosine similarity of every pair of block term vectors,
//! aggregated.

use super::{Aggregation, BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::delete_blank_lines;
use crate::config::TcConfig;
use crate::error::FeatureResult;
use crate::lexer::Token;
use crate::text::{identifier_terms, stems, TermSet};
use std::sync::{Arc, OnceLock};

const PREPROCESSOR_KEYWORDS: [&str; 6] = ["#ifdef", "#ifndef", "#if", "#elif", "#else", "#endif"];

pub fn calculators(snippet: &Arc<Snippet>, config: &TcConfig) -> Vec<BoxedCalculator> {
    let coherence = Arc::new(Coherence::new(snippet.clone(), config.threshold));
    [Aggregation::Min, Aggregation::Avg, Aggregation::Max]
        .into_iter()
        .map(|aggregation| -> BoxedCalculator {
            Box::new(TextCoherence {
                coherence: coherence.clone(),
                aggregation,
            })
        })
        .collect()
}

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Stemmed identifier terms of `code` after blank lines are dropped
fn dictionary(code: &str) -> TermSet {
    stems(&identifier_terms(&delete_blank_lines(code)))
}

/// Block pairs of one snippet, shared by its aggregations
pub struct Coherence {
    snippet: Arc<Snippet>,
    threshold: usize,
    cosines: OnceLock<Vec<f64>>,
}

impl Coherence {
    pub fn new(snippet: Arc<Snippet>, threshold: usize) -> Self {
        Self {
            snippet,
            threshold,
            cosines: OnceLock::new(),
        }
    }

    /// Blocks long enough to take part: brace blocks need `threshold` lines
    /// between the braces, other blocks `threshold` lines in total
    pub fn documents(&self) -> FeatureResult<Vec<String>> {
        let code = self.snippet.code();
        let mut blocks = brace_blocks(code, self.snippet.tokens()?);
        blocks.extend(preprocessor_blocks(code));

        let threshold = self.threshold as isize;
        Ok(blocks
            .into_iter()
            .filter(|block| {
                let lines = block.split('\n').count() as isize;
                if block.starts_with('{') {
                    block.ends_with('}') && lines - 2 >= threshold
                } else {
                    lines >= threshold
                }
            })
            .collect())
    }

    pub fn dictionary(&self) -> TermSet {
        dictionary(self.snippet.code())
    }

    pub fn cosines(&self) -> FeatureResult<&[f64]> {
        if let Some(cosines) = self.cosines.get() {
            return Ok(cosines);
        }
        let cosines = self.compute_cosines()?;
        Ok(self.cosines.get_or_init(|| cosines))
    }

    /// A block without dictionary terms scores 0 against the rest; when it is
    /// the left side of a pair it contributes a single 0 for all its pairs
    fn compute_cosines(&self) -> FeatureResult<Vec<f64>> {
        let vocabulary = self.dictionary();
        let vectors: Vec<Vec<f64>> = self
            .documents()?
            .iter()
            .map(|document| {
                let terms = dictionary(document);
                vocabulary
                    .iter()
                    .map(|word| if terms.contains(word) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect();

        let mut cosines = Vec::new();
        for i in 0..vectors.len().saturating_sub(1) {
            if vectors[i].iter().all(|&x| x == 0.0) {
                cosines.push(0.0);
                continue;
            }
            for j in i + 1..vectors.len() {
                cosines.push(cosine_similarity(&vectors[i], &vectors[j]));
            }
        }
        Ok(cosines)
    }
}

/// Text from each `{` through its matching `}` when they are more than one line apart
fn brace_blocks(code: &str, tokens: &[Token]) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut open: Vec<&Token> = Vec::new();
    for token in tokens {
        match token.value.as_str() {
            "{" => open.push(token),
            "}" => {
                let Some(opening) = open.pop() else {
                    continue;
                };
                if token.end.line - opening.start.line > 1 {
                    if let Some(block) = code.get(opening.start.offset..token.end.offset) {
                        blocks.push(block.to_string());
                    }
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Bodies of preprocessor conditionals.
///
/// The lines from the first directive to the last are laid out as a character
/// grid. A directive other than `#endif` opens a block that runs until the next
/// line whose first `#` sits in the same column.
fn preprocessor_blocks(code: &str) -> Vec<String> {
    let mut scratch = code.to_string();
    let mut marks = Vec::new();
    for keyword in PREPROCESSOR_KEYWORDS {
        while let Some(at) = scratch.find(keyword) {
            marks.push(at);
            marks.push(at + keyword.len());
            scratch.replace_range(at..at + keyword.len(), &" ".repeat(keyword.len()));
        }
    }
    let (Some(&first), Some(&last)) = (marks.iter().min(), marks.iter().max()) else {
        return Vec::new();
    };

    let start = code[..first].rfind('\n').map_or(0, |i| i + 1);
    let grid: Vec<Vec<char>> = code[start..last].split('\n').map(|line| line.chars().collect()).collect();
    let cols = grid.iter().map(Vec::len).max().unwrap_or(0);

    // column of the first `#` in a row, scanning no further than the grid width
    let hash_column = |row: &Vec<char>| -> Option<usize> {
        let mut col = 0;
        while col + 1 < cols && row.get(col) != Some(&'#') {
            col += 1;
        }
        (row.get(col) == Some(&'#')).then_some(col)
    };

    let mut spans = Vec::new();
    for (i, row) in grid.iter().enumerate() {
        let Some(col) = hash_column(row) else {
            continue;
        };
        if row.get(col + 1) == Some(&'e') && row.get(col + 2) == Some(&'n') {
            continue;
        }
        if let Some(end) = (i + 1..grid.len()).find(|&k| hash_column(&grid[k]) == Some(col)) {
            spans.push((i + 1, end));
        }
    }

    spans
        .into_iter()
        .map(|(from, to)| {
            grid[from..to].iter().fold(String::new(), |mut text, row| {
                text.extend(row.iter());
                text.push('\n');
                text
            })
        })
        .filter(|text| !text.trim().is_empty())
        .collect()
}

pub struct TextCoherence {
    coherence: Arc<Coherence>,
    aggregation: Aggregation,
}

impl FeatureCalculator for TextCoherence {
    fn name(&self) -> String {
        format!("Text Coherence {}", self.aggregation)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        Ok(self.aggregation.apply(self.coherence.cosines()?))
    }
}
