use crate::matrix::{Cost, Matrix};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

/// Row `r` is assigned to column `assignment[r]`.
pub type Assignment = Vec<usize>;

///
/// Set of covered lines of a matrix.
///
/// Equality and ordering only depend on which rows and columns are covered,
/// never on the order the lines were picked in.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Cover {
    pub rows: BTreeSet<usize>,
    pub cols: BTreeSet<usize>,
}

impl Cover {
    pub fn new(rows: &[usize], cols: &[usize]) -> Self {
        Self {
            rows: rows.iter().copied().collect(),
            cols: cols.iter().copied().collect(),
        }
    }

    /// Builds a cover from line indices where `0..size` are rows and
    /// `size..2 * size` are columns.
    pub fn from_lines(lines: &[usize], size: usize) -> Self {
        Self {
            rows: lines.iter().copied().filter(|&l| l < size).collect(),
            cols: lines.iter().filter(|&&l| l >= size).map(|&l| l - size).collect(),
        }
    }

    /// Number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    #[inline]
    pub fn covers_row(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    #[inline]
    pub fn covers_col(&self, col: usize) -> bool {
        self.cols.contains(&col)
    }

    #[inline]
    pub fn covers(&self, (row, col): (usize, usize)) -> bool {
        self.covers_row(row) || self.covers_col(col)
    }
}

/// Enumerates every cover with the minimum number of lines.
///
/// Line counts are tried from 1 upward and all `C(2n, i)` line combinations of
/// a count are checked in lexicographic order; every covering combination of
/// the first successful count is kept. Returns the covers and the line count.
pub fn minimal_covers<T: Cost>(matrix: &Matrix<T>) -> (Vec<Cover>, usize) {
    let size = matrix.size();
    let zeros = matrix.zeros();

    for count in 1..=2 * size {
        let covers = (0..2 * size)
            .combinations(count)
            .map(|lines| Cover::from_lines(&lines, size))
            .filter(|cover| zeros.iter().all(|&cell| cover.covers(cell)))
            .collect::<Vec<_>>();
        if !covers.is_empty() {
            trace!("{} minimal covers with {} lines", covers.len(), count);
            return (covers, count);
        }
    }
    // unreachable for size > 0: covering every row always works
    (vec![Cover::from_lines(&(0..size).collect::<Vec<_>>(), size)], size)
}

/// All permutations that pick exactly one zero cell per row and column,
/// sorted and without duplicates.
pub fn zero_assignments<T: Cost>(matrix: &Matrix<T>) -> BTreeSet<Assignment> {
    let size = matrix.size();
    (0..size)
        .permutations(size)
        .filter(|perm| perm.iter().enumerate().all(|(r, &c)| matrix.get(r, c).is_zero()))
        .collect()
}
