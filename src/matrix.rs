//! Dense Matrix and Power Transform
//!
//! Row-major `f64` storage sized for the 20×20 residue matrices. Powers are
//! taken by repeated squaring; every product accumulates in plain double
//! precision with no element-wise shortcuts.

use crate::error::{PamError, Result};

/// Dense row-major matrix of reals
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Wrap row-major data
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(PamError::Dimension(format!(
                "{} values cannot fill a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(PamError::Dimension(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { rows: n, cols: n, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at row `i`, column `j`. Panics when out of range, like slice indexing.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of range", i, j);
        self.data[i * self.cols + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.rows).map(|i| self.row(i).iter().sum()).collect()
    }

    /// Divide every entry by `divisor`, returning a new matrix
    pub fn scaled_down(&self, divisor: f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v / divisor).collect(),
        }
    }

    /// Matrix product `self × other`
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(PamError::Dimension(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }

        let mut out = vec![0.0; self.rows * other.cols];
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self.data[i * self.cols + k] * other.data[k * other.cols + j];
                }
                out[i * other.cols + j] = sum;
            }
        }

        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            data: out,
        })
    }

    /// Largest absolute entry-wise difference (shapes must match)
    pub fn max_abs_diff(&self, other: &Matrix) -> Result<f64> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(PamError::Dimension(format!(
                "cannot compare {}x{} with {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max))
    }
}

/// Raise a square matrix to the `x`-th power
///
/// `x = 0` yields the identity and `x = 1` a copy of `m`. Larger exponents
/// use binary exponentiation, so PAM250 costs 9 squarings and 2 extra
/// products instead of 249 products.
pub fn power(m: &Matrix, x: u32) -> Result<Matrix> {
    if !m.is_square() {
        return Err(PamError::Dimension(format!(
            "cannot raise a {}x{} matrix to a power",
            m.rows, m.cols
        )));
    }

    let mut result = Matrix::identity(m.rows);
    let mut base = m.clone();
    let mut e = x;

    while e > 0 {
        if e & 1 == 1 {
            result = result.multiply(&base)?;
        }
        e >>= 1;
        if e > 0 {
            base = base.multiply(&base)?;
        }
    }

    Ok(result)
}
