//! Background Frequencies
//!
//! The null-model denominator of every log-odds score. A run picks one
//! `FrequencySource`; it is resolved against the loaded alphabet so that
//! labelled constants line up with whatever column order the file uses.

use serde::{Deserialize, Serialize};

use crate::alphabet::{AminoAcidAlphabet, STANDARD_ORDER};
use crate::error::{PamError, Result};

/// Dayhoff background frequencies, in `STANDARD_ORDER`
pub const DAYHOFF_FREQUENCIES: [f64; 20] = [
    0.087, 0.041, 0.040, 0.047, 0.033, 0.038, 0.050, 0.089, 0.034, 0.037,
    0.085, 0.081, 0.015, 0.040, 0.051, 0.070, 0.058, 0.010, 0.030, 0.065,
];

/// Allowed drift of a frequency vector's sum away from 1 before warning
const SUM_TOLERANCE: f64 = 0.01;

/// Where the background frequencies come from
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencySource {
    /// 1/n for every residue
    #[default]
    Uniform,
    /// Dayhoff constants, matched to the alphabet by label
    Dayhoff,
    /// Explicit values in alphabet (file) order
    Literal(Vec<f64>),
}

impl FrequencySource {
    /// Produce a frequency vector indexed like `alphabet`
    pub fn resolve(&self, alphabet: &AminoAcidAlphabet) -> Result<FrequencyVector> {
        match self {
            FrequencySource::Uniform => Ok(FrequencyVector::uniform(alphabet.len())),
            FrequencySource::Dayhoff => {
                let values = alphabet
                    .labels()
                    .iter()
                    .map(|label| {
                        STANDARD_ORDER
                            .iter()
                            .position(|c| c == label)
                            .map(|i| DAYHOFF_FREQUENCIES[i])
                            .ok_or_else(|| {
                                PamError::Value(format!("no Dayhoff frequency for '{}'", label))
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                FrequencyVector::new(values)
            }
            FrequencySource::Literal(values) => {
                if values.len() != alphabet.len() {
                    return Err(PamError::Value(format!(
                        "{} frequencies supplied for a {}-letter alphabet",
                        values.len(),
                        alphabet.len()
                    )));
                }
                FrequencyVector::new(values.clone())
            }
        }
    }
}

/// Background occurrence rates, one per alphabet position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyVector {
    values: Vec<f64>,
}

impl FrequencyVector {
    /// Values must be finite and non-negative. Zeros are allowed; the scorer
    /// turns the affected column into sentinel penalties.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if let Some((i, v)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(PamError::Value(format!(
                "frequency at position {} is {}, expected a non-negative number",
                i, v
            )));
        }

        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            tracing::warn!("Background frequencies sum to {:.4}, not 1", sum);
        }

        Ok(Self { values })
    }

    pub fn uniform(n: usize) -> Self {
        Self {
            values: vec![1.0 / n as f64; n],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize) -> f64 {
        self.values[i]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}
