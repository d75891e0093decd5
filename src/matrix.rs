use crate::cover::Cover;
use anyhow::{ensure, Result};
use num_traits::{FromPrimitive, NumAssign, PrimInt, Signed};
use serde::Serialize;
use std::fmt::{Debug, Display};

/// Numeric bound for matrix cells.
///
/// Cells are exact integers in units of the instance precision, so every
/// reduction and adjustment step is exact and zero detection needs no epsilon.
pub trait Cost:
    PrimInt + Signed + Display + Debug + FromPrimitive + NumAssign
{
}

impl<T> Cost for T where
    T: PrimInt + Signed + Display + Debug + FromPrimitive + NumAssign
{
}

///
/// Square cost matrix stored row-major.
///
/// Every procedure step returns a new matrix, so each intermediate state of a
/// route stays inspectable.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Matrix<T: Cost> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Cost> Matrix<T> {
    pub fn from_vec(size: usize, cells: Vec<T>) -> Result<Self> {
        ensure!(size > 0, "matrix must have at least one row");
        ensure!(
            cells.len() == size * size,
            "expected {} cells for a {}x{} matrix, got {}",
            size * size,
            size,
            size,
            cells.len()
        );
        Ok(Self { size, cells })
    }

    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let size = rows.len();
        ensure!(
            rows.iter().all(|row| row.len() == size),
            "matrix rows must all have length {}",
            size
        );
        Self::from_vec(size, rows.iter().flatten().copied().collect())
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.cells[row * self.size + col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.size)
    }

    /// Coordinates of the zero cells in row-major order.
    pub fn zeros(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_zero())
            .map(|(idx, _)| (idx / self.size, idx % self.size))
            .collect()
    }

    /// Step 1: subtract every row's minimum from that row.
    pub fn reduce_rows(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in self.rows() {
            let min = row.iter().copied().min().unwrap_or_else(T::zero);
            cells.extend(row.iter().map(|&v| v - min));
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// Step 2: subtract every column's minimum from that column.
    pub fn reduce_cols(&self) -> Self {
        let mins = (0..self.size)
            .map(|c| {
                (0..self.size)
                    .map(|r| self.get(r, c))
                    .min()
                    .unwrap_or_else(T::zero)
            })
            .collect::<Vec<T>>();
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, &v)| v - mins[idx % self.size])
            .collect();
        Self {
            size: self.size,
            cells,
        }
    }

    /// Step 4: shift the smallest uncovered value.
    ///
    /// With `m` the minimum over cells whose row and column are both uncovered,
    /// uncovered cells lose `m`, doubly covered cells gain `m`, singly covered
    /// cells keep their value. A cover touching every cell leaves the matrix as is.
    pub fn adjust(&self, cover: &Cover) -> Self {
        let n = self.size;
        let min = (0..n)
            .flat_map(|r| (0..n).map(move |c| (r, c)))
            .filter(|&(r, c)| !cover.covers_row(r) && !cover.covers_col(c))
            .map(|(r, c)| self.get(r, c))
            .min();
        let min = match min {
            Some(min) => min,
            None => return self.clone(),
        };

        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(idx, &v)| {
                let (r, c) = (idx / n, idx % n);
                match (cover.covers_row(r), cover.covers_col(c)) {
                    (false, false) => v - min,
                    (true, true) => v + min,
                    _ => v,
                }
            })
            .collect();
        Self { size: n, cells }
    }

    /// Strictly decreases with every adjustment of a non-terminal matrix.
    #[cfg(test)]
    pub fn sum(&self) -> T {
        self.cells.iter().fold(T::zero(), |acc, &v| acc + v)
    }
}
