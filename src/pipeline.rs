//! PAM Generator - main entry point for building a PAMx table
//!
//! Runs the four stages strictly in order:
//!   1. load the PAM1 table
//!   2. raise it to the x-th power
//!   3. convert to log-odds scores against the background frequencies
//!   4. write the labelled score matrix
//!
//! The output file is only touched once the full matrix has been computed.

use serde::Serialize;
use std::path::Path;

use crate::alphabet::AminoAcidAlphabet;
use crate::config::PamConfig;
use crate::error::{PamError, Result};
use crate::frequencies::FrequencyVector;
use crate::loader;
use crate::matrix::{power, Matrix};
use crate::scorer::{score, ScoreMatrix};
use crate::writer;

/// Result of one PAMx computation
#[derive(Debug, Clone, Serialize)]
pub struct PamTable {
    /// Evolutionary distance `x`
    pub distance: u32,
    pub alphabet: AminoAcidAlphabet,
    pub frequencies: FrequencyVector,
    pub scores: ScoreMatrix,
}

impl PamTable {
    /// Score for ancestral residue `from` replaced by `to`
    pub fn score(&self, from: char, to: char) -> Option<i32> {
        let i = self.alphabet.index_of(from)?;
        let j = self.alphabet.index_of(to)?;
        Some(self.scores.get(i, j))
    }

    /// Expected score of a random residue pair under the background model
    pub fn expected_score(&self) -> Result<f64> {
        self.scores.expected_score(&self.frequencies)
    }
}

/// Validated configuration plus the pipeline stages
pub struct PamGenerator {
    config: PamConfig,
}

impl PamGenerator {
    pub fn new(config: PamConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PamConfig {
        &self.config
    }

    /// Load `input`, build PAMx, write it to `output`
    pub fn generate(&self, x: u32, input: &Path, output: &Path) -> Result<PamTable> {
        check_distance(x)?;

        let (alphabet, pam1) = loader::load(input, &self.config)?;
        tracing::info!("Loaded PAM1 table from {}", input.display());

        let table = self.compute(x, alphabet, &pam1)?;

        writer::write(
            output,
            &table.alphabet,
            &table.scores,
            self.config.output_format,
            self.config.delimiter,
        )?;
        tracing::info!("Wrote PAM{} to {}", x, output.display());

        Ok(table)
    }

    /// Power and score stages only, no file I/O
    pub fn compute(&self, x: u32, alphabet: AminoAcidAlphabet, pam1: &Matrix) -> Result<PamTable> {
        check_distance(x)?;
        if pam1.rows() != alphabet.len() || pam1.cols() != alphabet.len() {
            return Err(PamError::Dimension(format!(
                "{}x{} matrix for a {}-letter alphabet",
                pam1.rows(),
                pam1.cols(),
                alphabet.len()
            )));
        }

        let frequencies = self.config.frequencies.resolve(&alphabet)?;

        let powered = power(pam1, x)?;
        tracing::debug!("Computed PAM1^{}", x);

        let scores = score(&powered, &frequencies, &self.config.scoring_params())?;
        tracing::info!(
            "Scored PAM{}: range [{}, {}]",
            x,
            scores.min().unwrap_or(0),
            scores.max().unwrap_or(0)
        );

        Ok(PamTable {
            distance: x,
            alphabet,
            frequencies,
            scores,
        })
    }
}

/// Build a PAMx table from `input` and write it to `output`
///
/// # Example
/// ```no_run
/// use pam_builder::{generate_pam, FrequencySource, PamConfig};
/// use std::path::Path;
///
/// let config = PamConfig {
///     frequencies: FrequencySource::Dayhoff,
///     ..PamConfig::default()
/// };
/// let table = generate_pam(250, Path::new("data/pam1_dayhoff.txt"), Path::new("pam250.txt"), &config)?;
/// assert_eq!(table.score('W', 'W'), Some(17));
/// # Ok::<(), pam_builder::PamError>(())
/// ```
pub fn generate_pam(x: u32, input: &Path, output: &Path, config: &PamConfig) -> Result<PamTable> {
    PamGenerator::new(config.clone())?.generate(x, input, output)
}

fn check_distance(x: u32) -> Result<()> {
    if x == 0 {
        return Err(PamError::Value(
            "evolutionary distance must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
