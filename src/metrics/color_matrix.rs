//! Character-grid view of a snippet where each cell holds the kind code of the
//! token covering it (0 for whitespace and untokenized bytes)

use super::Snippet;
use crate::error::{FeatureError, FeatureResult};
use crate::lexer::{Token, TokenKind};
use nalgebra::DMatrix;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, PartialEq)]
pub struct ColorMatrix {
    cells: DMatrix<u8>,
}

impl ColorMatrix {
    /// One row per line and one column per byte of the longest line
    /// (terminator included). Multi-line comments color each covered row from
    /// the comment's column on the first row and from column 0 after that.
    pub fn build(lines: &[&str], tokens: &[Token]) -> FeatureResult<Self> {
        let rows = lines.len();
        let cols = lines.iter().map(|line| line.len()).max().unwrap_or(0);
        let mut cells = DMatrix::zeros(rows, cols);

        for token in tokens {
            let code = token.kind.code();
            if !token.is_multiline() {
                let start = token.start.column.saturating_sub(1);
                let end = token.end.column.saturating_sub(1);
                paint(&mut cells, token, token.start.line, start..end, code)?;
            } else if token.kind == TokenKind::Comment {
                let mut start = token.start.column.saturating_sub(1);
                for (i, part) in token.value.split_inclusive('\n').enumerate() {
                    paint(&mut cells, token, token.start.line + i, start..start + part.len(), code)?;
                    start = 0;
                }
            } else {
                return Err(FeatureError::MultiLineToken {
                    value: token.value.clone(),
                    kind: token.kind,
                });
            }
        }

        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[(row, col)]
    }

    pub fn row(&self, row: usize) -> impl DoubleEndedIterator<Item = u8> + '_ {
        (0..self.cols()).map(move |col| self.cells[(row, col)])
    }

    /// 1.0 where the cell holds `kind`, 0.0 elsewhere
    pub fn mask(&self, kind: TokenKind) -> DMatrix<f64> {
        let code = kind.code();
        self.cells.map(|cell| if cell == code { 1.0 } else { 0.0 })
    }

    /// Cells of each row from its last colored cell leftwards. Trailing
    /// uncolored cells are skipped.
    pub fn right_anchored(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.rows()).flat_map(move |i| self.row(i).rev().skip_while(|&cell| cell == 0))
    }
}

fn paint(
    cells: &mut DMatrix<u8>,
    token: &Token,
    line: usize,
    columns: std::ops::Range<usize>,
    code: u8,
) -> FeatureResult<()> {
    let out_of_range = || FeatureError::TokenOutOfRange {
        value: token.value.clone(),
        line,
        column: columns.end,
    };
    let row = line.checked_sub(1).filter(|&r| r < cells.nrows()).ok_or_else(out_of_range)?;
    if columns.end > cells.ncols() {
        return Err(out_of_range());
    }
    for col in columns.clone() {
        cells[(row, col)] = code;
    }
    Ok(())
}

/// A snippet together with its lazily built color matrix
pub struct Canvas {
    snippet: Arc<Snippet>,
    matrix: OnceLock<ColorMatrix>,
}

impl Canvas {
    pub fn new(snippet: Arc<Snippet>) -> Self {
        Self {
            snippet,
            matrix: OnceLock::new(),
        }
    }

    pub fn snippet(&self) -> &Arc<Snippet> {
        &self.snippet
    }

    pub fn matrix(&self) -> FeatureResult<&ColorMatrix> {
        if let Some(matrix) = self.matrix.get() {
            return Ok(matrix);
        }
        let matrix = ColorMatrix::build(&self.snippet.lines(), self.snippet.tokens()?)?;
        Ok(self.matrix.get_or_init(|| matrix))
    }
}
