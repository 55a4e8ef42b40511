//! PAM Builder
//!
//! Computes PAMx amino acid substitution score matrices from a PAM1 mutation
//! probability table.
//!
//! Pipeline stages, one module each:
//! - `loader`: parse the labelled 20×20 PAM1 table
//! - `matrix`: dense matrix type and `power` (PAM1 → PAMx)
//! - `scorer`: log-odds scores against background frequencies
//! - `writer`: text/JSON output in the input's tabular layout
//!
//! `pipeline::generate_pam` chains them for a single run.

pub mod alphabet;
pub mod config;
pub mod error;
pub mod frequencies;
pub mod loader;
pub mod matrix;
pub mod pipeline;
pub mod scorer;
pub mod writer;

// Re-export commonly used types
pub use alphabet::{AminoAcidAlphabet, STANDARD_ORDER};
pub use config::{Delimiter, PamConfig};
pub use error::{PamError, Result};
pub use frequencies::{FrequencySource, FrequencyVector, DAYHOFF_FREQUENCIES};
pub use matrix::{power, Matrix};
pub use pipeline::{generate_pam, PamGenerator, PamTable};
pub use scorer::{score, RoundingMode, ScoreMatrix, ScoringParams};
pub use writer::OutputFormat;
