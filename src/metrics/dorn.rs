//! Visual features from Dorn's readability model
//!
//! Character alignment, the share of the snippet's "picture" taken by each
//! token class, and how much high-frequency content per-line signals and the
//! color matrix carry. Tokens are classified through [`RseLexer`].

use super::color_matrix::Canvas;
use super::fourier::{bandwidth, dft2_amplitudes, dft_amplitudes};
use super::{BoxedCalculator, FeatureCalculator, Snippet};
use crate::analyzer::delete_comments;
use crate::error::FeatureResult;
use crate::lexer::{RseLexer, TokenKind};
use crate::text::split_lines;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// Kinds measured by the single-kind area features
pub const AREA_KINDS: [TokenKind; 7] = [
    TokenKind::Identifier,
    TokenKind::Comment,
    TokenKind::Keyword,
    TokenKind::Operator,
    TokenKind::Number,
    TokenKind::String,
    TokenKind::Literal,
];

/// Kinds paired by the mutual area features and used by the 2D bandwidths
pub const PAIRED_KINDS: [TokenKind; 7] = [
    TokenKind::Comment,
    TokenKind::Identifier,
    TokenKind::Keyword,
    TokenKind::Number,
    TokenKind::String,
    TokenKind::Literal,
    TokenKind::Operator,
];

const TAB_WIDTH: f64 = 4.0;

lazy_static! {
    static ref ASSIGNMENT: Regex = Regex::new(r"[^=]=[^=]").unwrap();
    static ref COMPARISON: Regex = Regex::new(r"(==|<=|>=|!=|<|>)").unwrap();
    static ref NUMBER: Regex = Regex::new(r"[^A-Za-z]\d+\.?\d*").unwrap();
    static ref ARITHMETIC: Regex = Regex::new(r"[+\-*/%]").unwrap();
    static ref OPENER: Regex = Regex::new(r"[({]").unwrap();
}

/// Every Dorn feature for `snippet`, in registry order
pub fn calculators(snippet: &Arc<Snippet>) -> Vec<BoxedCalculator> {
    let rse = Arc::new(snippet.with_lexer(Arc::new(RseLexer::new(snippet.lexer().clone()))));
    let canvas = Arc::new(Canvas::new(rse.clone()));
    let signals = Arc::new(LineSignals::new(canvas.clone()));

    let mut calculators: Vec<BoxedCalculator> = vec![
        Box::new(AlignmentBlocks::new(rse.clone())),
        Box::new(AlignmentExtent::new(rse)),
    ];

    for kind in AREA_KINDS {
        calculators.push(Box::new(ColorArea::new(canvas.clone(), kind)));
    }

    for i in 0..PAIRED_KINDS.len() - 1 {
        for j in i + 1..PAIRED_KINDS.len() {
            calculators.push(Box::new(MutualColorArea::new(
                canvas.clone(),
                PAIRED_KINDS[j],
                PAIRED_KINDS[i],
            )));
        }
    }

    for kind in DftKind::ALL {
        calculators.push(Box::new(DftBandwidth::new(signals.clone(), kind)));
    }

    for kind in PAIRED_KINDS {
        for axis in [Axis::X, Axis::Y] {
            calculators.push(Box::new(VisualBandwidth::new(canvas.clone(), axis, kind)));
        }
    }

    calculators
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\t')
}

fn per_line(lines: &[&str], f: impl Fn(&str) -> f64) -> Vec<f64> {
    lines.iter().map(|&line| f(line)).collect()
}

fn char_lines(snippet: &Snippet) -> Vec<Vec<char>> {
    snippet.lines().iter().map(|line| line.chars().collect()).collect()
}

/// Vertical runs of the same non-blank character, scanned column by column
pub struct AlignmentBlocks {
    snippet: Arc<Snippet>,
}

impl AlignmentBlocks {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for AlignmentBlocks {
    fn name(&self) -> String {
        "Dorn align blocks".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let lines = char_lines(&self.snippet);
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);

        let mut blocks = 0;
        for column in 0..width {
            let mut last: Option<char> = None;
            let mut in_block = false;
            for line in &lines {
                let Some(&c) = line.get(column) else {
                    last = None;
                    continue;
                };
                if last != Some(c) {
                    in_block = false;
                    last = Some(c);
                } else if !in_block && !is_blank(c) {
                    in_block = true;
                    blocks += 1;
                }
            }
        }
        Ok(blocks as f64)
    }
}

/// Number of characters that repeat the non-blank character directly above them
pub struct AlignmentExtent {
    snippet: Arc<Snippet>,
}

impl AlignmentExtent {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self { snippet }
    }
}

impl FeatureCalculator for AlignmentExtent {
    fn name(&self) -> String {
        "Dorn align extent".to_string()
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let lines = char_lines(&self.snippet);
        let width = lines.iter().map(Vec::len).max().unwrap_or(0);

        let mut extent = 0;
        for column in 0..width {
            let mut last: Option<char> = None;
            for line in &lines {
                let Some(&c) = line.get(column) else {
                    last = None;
                    continue;
                };
                if last == Some(c) && !is_blank(c) {
                    extent += 1;
                } else {
                    last = Some(c);
                }
            }
        }
        Ok(extent as f64)
    }
}

/// Share of the right-anchored color-matrix cells holding `kind`
pub struct ColorArea {
    canvas: Arc<Canvas>,
    kind: TokenKind,
}

impl ColorArea {
    pub fn new(canvas: Arc<Canvas>, kind: TokenKind) -> Self {
        Self { canvas, kind }
    }
}

impl FeatureCalculator for ColorArea {
    fn name(&self) -> String {
        format!("Dorn Areas {}s", self.kind)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let code = self.kind.code();
        let (mut total, mut colored) = (0usize, 0usize);
        for cell in self.canvas.matrix()?.right_anchored() {
            total += 1;
            if cell == code {
                colored += 1;
            }
        }
        Ok(if total > 0 { colored as f64 / total as f64 } else { 0.0 })
    }
}

/// Ratio between the areas of two kinds
pub struct MutualColorArea {
    canvas: Arc<Canvas>,
    numerator: TokenKind,
    denominator: TokenKind,
}

impl MutualColorArea {
    pub fn new(canvas: Arc<Canvas>, numerator: TokenKind, denominator: TokenKind) -> Self {
        Self {
            canvas,
            numerator,
            denominator,
        }
    }
}

impl FeatureCalculator for MutualColorArea {
    fn name(&self) -> String {
        format!("Dorn Areas {}s / {}s", self.numerator, self.denominator)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let (top, bottom) = (self.numerator.code(), self.denominator.code());
        let (mut top_cells, mut bottom_cells) = (0usize, 0usize);
        for cell in self.canvas.matrix()?.right_anchored() {
            if cell == top {
                top_cells += 1;
            }
            if cell == bottom {
                bottom_cells += 1;
            }
        }
        Ok(if bottom_cells > 0 {
            top_cells as f64 / bottom_cells as f64
        } else {
            0.0
        })
    }
}

/// Per-line signal fed to the 1D bandwidth features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DftKind {
    Assignments,
    Commas,
    Comments,
    Comparisons,
    Conditionals,
    Indentations,
    Keywords,
    LineLengths,
    Loops,
    Identifiers,
    Numbers,
    Operators,
    Parenthesis,
    Periods,
    Spaces,
}

impl DftKind {
    pub const ALL: [DftKind; 15] = [
        DftKind::Assignments,
        DftKind::Commas,
        DftKind::Comments,
        DftKind::Comparisons,
        DftKind::Conditionals,
        DftKind::Indentations,
        DftKind::Keywords,
        DftKind::LineLengths,
        DftKind::Loops,
        DftKind::Identifiers,
        DftKind::Numbers,
        DftKind::Operators,
        DftKind::Parenthesis,
        DftKind::Periods,
        DftKind::Spaces,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DftKind::Assignments => "Assignments",
            DftKind::Commas => "Commas",
            DftKind::Comments => "Comments",
            DftKind::Comparisons => "Comparisons",
            DftKind::Conditionals => "Conditionals",
            DftKind::Indentations => "Indentations",
            DftKind::Keywords => "Keywords",
            DftKind::LineLengths => "LineLengths",
            DftKind::Loops => "Loops",
            DftKind::Identifiers => "Identifiers",
            DftKind::Numbers => "Numbers",
            DftKind::Operators => "Operators",
            DftKind::Parenthesis => "Parenthesis",
            DftKind::Periods => "Periods",
            DftKind::Spaces => "Spaces",
        }
    }
}

/// Inputs shared by every 1D bandwidth feature of a snippet
pub struct LineSignals {
    canvas: Arc<Canvas>,
    uncommented: Arc<Snippet>,
}

impl LineSignals {
    pub fn new(canvas: Arc<Canvas>) -> Self {
        let snippet = canvas.snippet();
        let uncommented = Arc::new(snippet.derive(&delete_comments(snippet.code())));
        Self { canvas, uncommented }
    }

    pub fn signal(&self, kind: DftKind) -> FeatureResult<Vec<f64>> {
        let lines = split_lines(self.uncommented.code());

        Ok(match kind {
            DftKind::Assignments => per_line(&lines, |line| ASSIGNMENT.find_iter(line).count() as f64),
            // one captured group per match
            DftKind::Comparisons => per_line(&lines, |line| 2.0 * COMPARISON.find_iter(line).count() as f64),
            DftKind::Numbers => per_line(&lines, |line| NUMBER.find_iter(line).count() as f64),
            DftKind::Operators => per_line(&lines, |line| ARITHMETIC.find_iter(line).count() as f64),
            DftKind::Parenthesis => per_line(&lines, |line| OPENER.find_iter(line).count() as f64),
            DftKind::Commas => per_line(&lines, |line| line.matches(',').count() as f64),
            DftKind::Periods => per_line(&lines, |line| line.matches('.').count() as f64),
            DftKind::Indentations => per_line(&lines, |line| {
                line.chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .map(|c| if c == '\t' { TAB_WIDTH } else { 1.0 })
                    .sum()
            }),
            DftKind::Spaces => per_line(&lines, |line| {
                if line.trim().is_empty() {
                    0.0
                } else {
                    line.matches(' ').count() as f64
                }
            }),
            DftKind::Conditionals => self.count_tokens(lines.len(), |kind, value| {
                kind == TokenKind::Keyword && value == "if"
            })?,
            DftKind::Keywords => self.count_tokens(lines.len(), |kind, _| kind == TokenKind::Keyword)?,
            DftKind::Loops => self.count_tokens(lines.len(), |kind, value| {
                kind == TokenKind::Keyword && (value == "for" || value == "while")
            })?,
            DftKind::Identifiers => self.count_tokens(lines.len(), |kind, _| kind == TokenKind::Identifier)?,
            DftKind::LineLengths => self
                .canvas
                .snippet()
                .lines()
                .iter()
                .map(|line| line.chars().count() as f64)
                .collect(),
            DftKind::Comments => self.comment_rows()?,
        })
    }

    /// Matching tokens of the comment-free code, counted by start line
    fn count_tokens(&self, line_count: usize, predicate: impl Fn(TokenKind, &str) -> bool) -> FeatureResult<Vec<f64>> {
        let mut counts = vec![0.0; line_count];
        for token in self.uncommented.tokens()? {
            if !predicate(token.kind, &token.value) {
                continue;
            }
            if let Some(slot) = token.start.line.checked_sub(1).and_then(|i| counts.get_mut(i)) {
                *slot += 1.0;
            }
        }
        Ok(counts)
    }

    /// 1.0 for color-matrix rows holding only comment and empty cells with at least one comment cell
    fn comment_rows(&self) -> FeatureResult<Vec<f64>> {
        let matrix = self.canvas.matrix()?;
        let comment = TokenKind::Comment.code();
        Ok((0..matrix.rows())
            .map(|i| {
                let only_comments = matrix.row(i).all(|cell| cell == 0 || cell == comment);
                let has_comment = matrix.row(i).any(|cell| cell == comment);
                if only_comments && has_comment {
                    1.0
                } else {
                    0.0
                }
            })
            .collect())
    }
}

/// Bandwidth of the DFT of a per-line signal, plus one
pub struct DftBandwidth {
    signals: Arc<LineSignals>,
    kind: DftKind,
}

impl DftBandwidth {
    pub fn new(signals: Arc<LineSignals>, kind: DftKind) -> Self {
        Self { signals, kind }
    }
}

impl FeatureCalculator for DftBandwidth {
    fn name(&self) -> String {
        format!("Dorn DFT {}", self.kind.name())
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let signal = self.signals.signal(self.kind)?;
        Ok(bandwidth(&dft_amplitudes(&signal)) + 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
        }
    }
}

/// Mean bandwidth of the 2D DFT of one kind's mask, over rows (X) or columns (Y)
pub struct VisualBandwidth {
    canvas: Arc<Canvas>,
    axis: Axis,
    kind: TokenKind,
}

impl VisualBandwidth {
    pub fn new(canvas: Arc<Canvas>, axis: Axis, kind: TokenKind) -> Self {
        Self { canvas, axis, kind }
    }
}

impl FeatureCalculator for VisualBandwidth {
    fn name(&self) -> String {
        format!("Dorn Visual {} {}", self.axis.name(), self.kind)
    }

    fn calculate_metric(&self) -> FeatureResult<f64> {
        let mask = self.canvas.matrix()?.mask(self.kind);
        let (rows, cols) = mask.shape();
        if rows == 0 || cols == 0 {
            return Ok(0.0);
        }

        let amplitudes = dft2_amplitudes(&mask);
        let bandwidths: Vec<f64> = match self.axis {
            Axis::X => amplitudes
                .row_iter()
                .map(|row| bandwidth(&row.iter().copied().collect::<Vec<_>>()))
                .collect(),
            Axis::Y => amplitudes
                .column_iter()
                .map(|column| bandwidth(&column.iter().copied().collect::<Vec<_>>()))
                .collect(),
        };
        Ok(bandwidths.iter().sum::<f64>() / bandwidths.len() as f64)
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

    fn signals(code: &str) -> LineSignals {
        let plain = snippet(code);
        let rse = Arc::new(plain.with_lexer(Arc::new(RseLexer::new(plain.lexer().clone()))));
        LineSignals::new(Arc::new(Canvas::new(rse)))
    }

    #[test]
    fn test_feature_names() {
        let names: Vec<String> = calculators(&snippet(CODE)).iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), 59);
        assert_eq!(names[0], "Dorn align blocks");
        assert_eq!(names[2], "Dorn Areas IDENTIFIERs");
        assert_eq!(names[9], "Dorn Areas IDENTIFIERs / COMMENTs");
        assert_eq!(names[10], "Dorn Areas KEYWORDs / COMMENTs");
        assert_eq!(names[29], "Dorn Areas OPERATORs / LITERALs");
        assert_eq!(names[30], "Dorn DFT Assignments");
        assert_eq!(names[44], "Dorn DFT Spaces");
        assert_eq!(names[45], "Dorn Visual X COMMENT");
        assert_eq!(names[46], "Dorn Visual Y COMMENT");
        assert_eq!(names[58], "Dorn Visual Y OPERATOR");
    }

    #[test]
    fn test_alignment() {
        let code = "int main() {
            int a = 10;
            int b = 20;
            return 0;
        }";
        assert_close(value(code, "Dorn align blocks"), 6.0);
        assert_close(value(code, "Dorn align extent"), 7.0);
        assert_close(value("", "Dorn align blocks"), 0.0);
    }

    #[test]
    fn test_color_areas() {
        assert_close(value("int main() {}", "Dorn Areas IDENTIFIERs"), 4.0 / 13.0);
        assert_close(value("int main() {}", "Dorn Areas KEYWORDs / IDENTIFIERs"), 3.0 / 4.0);
        assert_close(value("int main() {}", "Dorn Areas NUMBERs / KEYWORDs"), 0.0);

        let canvas = Arc::new(Canvas::new(snippet("int main() {}")));
        let mutual = MutualColorArea::new(canvas, TokenKind::Identifier, TokenKind::Keyword);
        assert_close(mutual.calculate_metric().unwrap(), 4.0 / 3.0);
        assert_close(value("", "Dorn Areas COMMENTs"), 0.0);
    }

    #[test]
    fn test_text_signals() {
        let signals = signals(CODE);
        let expected: [(DftKind, [f64; 11]); 10] = [
            (DftKind::Assignments, [0., 0., 1., 1., 0., 0., 0., 0., 1., 0., 0.]),
            (DftKind::Commas, [0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0.]),
            (DftKind::Indentations, [0., 12., 12., 12., 12., 16., 12., 12., 16., 12., 8.]),
            (DftKind::Comparisons, [0., 0., 0., 0., 2., 0., 0., 2., 0., 0., 0.]),
            (DftKind::Numbers, [0., 0., 1., 1., 0., 0., 0., 0., 1., 0., 0.]),
            (DftKind::Operators, [0., 0., 0., 0., 0., 0., 0., 0., 1., 0., 0.]),
            (DftKind::Parenthesis, [2., 0., 0., 0., 2., 1., 0., 1., 0., 0., 0.]),
            (DftKind::Periods, [0., 0., 0., 0., 0., 1., 0., 0., 0., 0., 0.]),
            (DftKind::Spaces, [2., 0., 15., 15., 16., 18., 12., 15., 20., 13., 8.]),
            (DftKind::Keywords, [1., 0., 1., 1., 1., 1., 0., 1., 0., 1., 0.]),
        ];
        for (kind, values) in expected {
            assert_eq!(signals.signal(kind).unwrap(), values.to_vec(), "{}", kind.name());
        }
    }

    #[test]
    fn test_token_signals() {
        let signals = signals(CODE);
        assert_eq!(
            signals.signal(DftKind::Conditionals).unwrap(),
            vec![0., 0., 0., 0., 1., 0., 0., 0., 0., 0., 0.]
        );
        assert_eq!(
            signals.signal(DftKind::Loops).unwrap(),
            vec![0., 0., 0., 0., 0., 0., 0., 1., 0., 0., 0.]
        );
        assert_eq!(
            signals.signal(DftKind::Identifiers).unwrap(),
            vec![1., 0., 1., 1., 2., 4., 0., 2., 2., 1., 0.]
        );
    }

    #[test]
    fn test_line_shape_signals() {
        let signals = signals(CODE);
        let lengths: Vec<f64> = CODE.split_inclusive('\n').map(|l| l.chars().count() as f64).collect();
        assert_eq!(signals.signal(DftKind::LineLengths).unwrap(), lengths);
        assert_eq!(
            signals.signal(DftKind::Comments).unwrap(),
            vec![0., 1., 1., 1., 0., 0., 0., 0., 0., 0., 0., 0., 0.]
        );
    }

    #[test]
    fn test_dft_bandwidth() {
        assert_close(value(CODE, "Dorn DFT Assignments"), 10.0);
        // an empty signal has no spectrum
        assert_close(value("", "Dorn DFT Commas"), 1.0);
    }

    #[test]
    fn test_visual_bandwidth() {
        assert_close(value("int main() {}", "Dorn Visual X IDENTIFIER"), 12.0);
        assert_close(value("int main() {}", "Dorn Visual Y IDENTIFIER"), 0.0);
        assert_close(value("", "Dorn Visual X COMMENT"), 0.0);
    }
}
