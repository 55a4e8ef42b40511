//! Log-Odds Scorer
//!
//! Turns an evolved probability matrix into integer substitution scores.
//!
//! Orientation: row `i` is the ancestral residue, column `j` the replacement,
//! and every cell is normalised by the replacement's background frequency:
//!
//! ```text
//! S[i][j] = round( scale × log_base( P[i][j] / f[j] ) )
//! ```
//!
//! Cells with `P[i][j] = 0` or `f[j] = 0` have no defined ratio and receive
//! the sentinel penalty (natural-log units) instead.

use serde::{Deserialize, Serialize};

use crate::error::{PamError, Result};
use crate::frequencies::FrequencyVector;
use crate::matrix::Matrix;

/// Tie-breaking rule for the final integer conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Banker's rounding: 2.5 → 2, 3.5 → 4
    #[default]
    HalfToEven,
    /// 2.5 → 3, -2.5 → -3
    HalfAwayFromZero,
}

impl RoundingMode {
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfToEven => value.round_ties_even(),
            RoundingMode::HalfAwayFromZero => value.round(),
        }
    }
}

/// Numeric knobs of the scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    pub log_base: f64,
    pub scale: f64,
    pub rounding: RoundingMode,
    pub sentinel: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            log_base: 10.0,
            scale: 10.0,
            rounding: RoundingMode::HalfToEven,
            sentinel: -10.0,
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.log_base.is_finite() && self.log_base > 0.0) || self.log_base == 1.0 {
            return Err(PamError::Value(format!(
                "log_base must be positive and not 1, got {}",
                self.log_base
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(PamError::Value(format!("scale must be positive, got {}", self.scale)));
        }
        if !self.sentinel.is_finite() {
            return Err(PamError::Value(format!("sentinel must be finite, got {}", self.sentinel)));
        }
        Ok(())
    }

    /// Convert a natural-log ratio into the final integer score
    fn to_score(&self, ln_ratio: f64) -> Result<i32> {
        let value = self.rounding.round(ln_ratio / self.log_base.ln() * self.scale);
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(PamError::Value(format!("score {} does not fit in 32 bits", value)));
        }
        Ok(value as i32)
    }
}

/// Square matrix of integer log-odds scores
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreMatrix {
    n: usize,
    scores: Vec<i32>,
}

impl ScoreMatrix {
    pub fn new(n: usize, scores: Vec<i32>) -> Result<Self> {
        if scores.len() != n * n {
            return Err(PamError::Dimension(format!(
                "{} scores cannot fill a {}x{} matrix",
                scores.len(),
                n,
                n
            )));
        }
        Ok(Self { n, scores })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.scores[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[i32] {
        &self.scores[i * self.n..(i + 1) * self.n]
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn min(&self) -> Option<i32> {
        self.scores.iter().copied().min()
    }

    pub fn max(&self) -> Option<i32> {
        self.scores.iter().copied().max()
    }

    /// Expected score of a random pair drawn from `frequencies`
    ///
    /// A usable local-alignment matrix has a negative expected score.
    pub fn expected_score(&self, frequencies: &FrequencyVector) -> Result<f64> {
        check_length(frequencies, self.n)?;
        let mut total = 0.0;
        for i in 0..self.n {
            for j in 0..self.n {
                total += frequencies.get(i) * frequencies.get(j) * self.get(i, j) as f64;
            }
        }
        Ok(total)
    }
}

fn check_length(frequencies: &FrequencyVector, n: usize) -> Result<()> {
    if frequencies.len() != n {
        return Err(PamError::Value(format!(
            "{} frequencies for a {}x{} matrix",
            frequencies.len(),
            n,
            n
        )));
    }
    Ok(())
}

/// Score an evolved probability matrix against background frequencies
pub fn score(
    powered: &Matrix,
    frequencies: &FrequencyVector,
    params: &ScoringParams,
) -> Result<ScoreMatrix> {
    if !powered.is_square() {
        return Err(PamError::Dimension(format!(
            "cannot score a {}x{} matrix",
            powered.rows(),
            powered.cols()
        )));
    }
    let n = powered.rows();
    check_length(frequencies, n)?;
    params.validate()?;

    let mut scores = Vec::with_capacity(n * n);
    let mut sentinel_cells = 0usize;

    for i in 0..n {
        for j in 0..n {
            let p = powered.get(i, j);
            let f = frequencies.get(j);

            let ln_ratio = if f > 0.0 && p > 0.0 {
                (p / f).ln()
            } else {
                sentinel_cells += 1;
                params.sentinel
            };

            scores.push(params.to_score(ln_ratio)?);
        }
    }

    if sentinel_cells > 0 {
        tracing::debug!("{} cells scored with the sentinel penalty", sentinel_cells);
    }

    ScoreMatrix::new(n, scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform_matrix(n: usize) -> Matrix {
        Matrix::new(n, n, vec![1.0 / n as f64; n * n]).unwrap()
    }

    #[test]
    fn test_rounding_modes_on_ties() {
        assert_eq!(RoundingMode::HalfToEven.round(2.5), 2.0);
        assert_eq!(RoundingMode::HalfToEven.round(3.5), 4.0);
        assert_eq!(RoundingMode::HalfToEven.round(-2.5), -2.0);
        assert_eq!(RoundingMode::HalfAwayFromZero.round(2.5), 3.0);
        assert_eq!(RoundingMode::HalfAwayFromZero.round(-2.5), -3.0);
        // Non-ties agree
        assert_eq!(RoundingMode::HalfToEven.round(-1.6), -2.0);
        assert_eq!(RoundingMode::HalfAwayFromZero.round(-1.6), -2.0);
    }

    #[test]
    fn test_background_matching_scores_zero() {
        let s = score(&uniform_matrix(20), &FrequencyVector::uniform(20), &ScoringParams::default())
            .unwrap();
        assert!((0..20).all(|i| s.row(i).iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_log_odds_value() {
        // 10 × log10(0.5 / 0.05) = 10
        let m = Matrix::from_rows(vec![vec![0.5, 0.5], vec![0.05, 0.95]]).unwrap();
        let f = FrequencyVector::new(vec![0.05, 0.95]).unwrap();
        let s = score(&m, &f, &ScoringParams::default()).unwrap();
        assert_eq!(s.get(0, 0), 10);
        assert_eq!(s.get(1, 0), 0);
        assert_eq!(s.get(1, 1), 0);
        // 10 × log10(0.5 / 0.95) = -2.79
        assert_eq!(s.get(0, 1), -3);
    }

    #[test]
    fn test_zero_frequency_column_gets_sentinel() {
        let mut values = vec![1.0 / 19.0; 20];
        values[7] = 0.0;
        let f = FrequencyVector::new(values).unwrap();
        let s = score(&uniform_matrix(20), &f, &ScoringParams::default()).unwrap();

        // -10 / ln(10) × 10 = -43.43
        for i in 0..20 {
            assert_eq!(s.get(i, 7), -43);
        }
        assert_ne!(s.get(0, 6), -43);
    }

    #[test]
    fn test_zero_probability_gets_sentinel() {
        let m = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.5, 0.5]]).unwrap();
        let f = FrequencyVector::uniform(2);
        let params = ScoringParams {
            sentinel: -5.0,
            ..ScoringParams::default()
        };
        let s = score(&m, &f, &params).unwrap();
        // -5 / ln(10) × 10 = -21.71
        assert_eq!(s.get(0, 1), -22);
    }

    #[test]
    fn test_frequency_length_mismatch() {
        let result = score(&uniform_matrix(20), &FrequencyVector::uniform(19), &ScoringParams::default());
        assert!(matches!(result, Err(PamError::Value(_))));
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Matrix::new(2, 3, vec![0.1; 6]).unwrap();
        let result = score(&m, &FrequencyVector::uniform(3), &ScoringParams::default());
        assert!(matches!(result, Err(PamError::Dimension(_))));
    }

    #[test]
    fn test_log_base_and_scale() {
        // log2(0.4 / 0.1) = 2, × 3 = 6
        let m = Matrix::from_rows(vec![vec![0.4, 0.6], vec![0.1, 0.9]]).unwrap();
        let f = FrequencyVector::new(vec![0.1, 0.9]).unwrap();
        let params = ScoringParams {
            log_base: 2.0,
            scale: 3.0,
            ..ScoringParams::default()
        };
        let s = score(&m, &f, &params).unwrap();
        assert_eq!(s.get(0, 0), 6);
    }

    #[test]
    fn test_rounding_mode_reaches_scores() {
        // log2(1.0 / 0.5) = 1 and the sentinel -ln 2 gives -1; × 2.5 lands on ±2.5
        let m = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.5, 0.5]]).unwrap();
        let f = FrequencyVector::uniform(2);
        let params = ScoringParams {
            log_base: 2.0,
            scale: 2.5,
            sentinel: -(2.0f64).ln(),
            ..ScoringParams::default()
        };

        let even = score(&m, &f, &params).unwrap();
        assert_eq!(even.row(0), &[2, -2]);
        assert_eq!(even.row(1), &[0, 0]);

        let away = score(
            &m,
            &f,
            &ScoringParams {
                rounding: RoundingMode::HalfAwayFromZero,
                ..params
            },
        )
        .unwrap();
        assert_eq!(away.row(0), &[3, -3]);
        assert_eq!(away.row(1), &[0, 0]);
    }

    #[test]
    fn test_helpers() {
        let s = ScoreMatrix::new(2, vec![5, -1, -1, 4]).unwrap();
        assert!(s.is_symmetric());
        assert_eq!(s.min(), Some(-1));
        assert_eq!(s.max(), Some(5));
        let e = s.expected_score(&FrequencyVector::uniform(2)).unwrap();
        assert_relative_eq!(e, 1.75);

        let s = ScoreMatrix::new(2, vec![5, -1, -2, 4]).unwrap();
        assert!(!s.is_symmetric());
        assert!(ScoreMatrix::new(2, vec![1, 2, 3]).is_err());
    }
}
