//! Run Configuration
//!
//! Every tunable of a PAM run in one serde struct. Missing JSON keys fall
//! back to the defaults below, so a config file only needs the fields it
//! changes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

use crate::error::{PamError, Result};
use crate::frequencies::FrequencySource;
use crate::scorer::{RoundingMode, ScoringParams};
use crate::writer::OutputFormat;

/// Fields of one matrix line; 21 covers a label plus 20 values
pub type Fields<'a> = SmallVec<[&'a str; 21]>;

/// Field separator used by the loader and writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Any run of spaces/tabs
    #[default]
    Whitespace,
    Tab,
    Char(char),
}

impl Delimiter {
    /// Split a line into trimmed fields
    ///
    /// Whitespace collapses runs of blanks. `Tab` and `Char` are exact: an
    /// empty cell stays an empty field so it is reported instead of shifting
    /// the columns after it.
    pub fn split<'a>(&self, line: &'a str) -> Fields<'a> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Tab => Self::split_on(line, '\t'),
            Delimiter::Char(c) => Self::split_on(line, *c),
        }
    }

    fn split_on(line: &str, sep: char) -> Fields<'_> {
        let line = line.trim();
        if line.is_empty() {
            return Fields::new();
        }
        line.split(sep).map(str::trim).collect()
    }
}

/// Configuration for a single PAM generation run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PamConfig {
    pub frequencies: FrequencySource,
    /// Divisor for entries stored as scaled integers (10,000 for Dayhoff tables)
    pub scale_constant: f64,
    pub log_base: f64,
    pub scale: f64,
    pub rounding: RoundingMode,
    /// Natural-log penalty for cells with zero probability or zero frequency
    pub sentinel: f64,
    pub delimiter: Delimiter,
    pub comment_marker: String,
    pub output_format: OutputFormat,
}

impl Default for PamConfig {
    fn default() -> Self {
        Self {
            frequencies: FrequencySource::Uniform,
            scale_constant: 10_000.0,
            log_base: 10.0,
            scale: 10.0,
            rounding: RoundingMode::HalfToEven,
            sentinel: -10.0,
            delimiter: Delimiter::Whitespace,
            comment_marker: "#".to_string(),
            output_format: OutputFormat::Text,
        }
    }
}

impl PamConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PamError::io(path, e))?;

        let config: PamConfig = serde_json::from_str(&contents)
            .map_err(|e| PamError::Config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check numeric ranges before any file is touched
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_constant.is_finite() && self.scale_constant > 0.0) {
            return Err(PamError::Value(format!(
                "scale_constant must be positive, got {}",
                self.scale_constant
            )));
        }
        self.scoring_params().validate()?;
        if self.comment_marker.is_empty() {
            return Err(PamError::Value("comment_marker must not be empty".to_string()));
        }
        if let Delimiter::Char(c) = self.delimiter {
            // Must not collide with the characters of a number
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.') {
                return Err(PamError::Value(format!("'{}' cannot be used as a delimiter", c)));
            }
            // Written headers start with the delimiter
            if self.comment_marker.starts_with(c) {
                return Err(PamError::Value(format!(
                    "delimiter '{}' collides with comment_marker '{}'",
                    c, self.comment_marker
                )));
            }
        }
        Ok(())
    }

    /// Subset of the config the scorer needs
    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            log_base: self.log_base,
            scale: self.scale,
            rounding: self.rounding,
            sentinel: self.sentinel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PamConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scale_constant, 10_000.0);
        assert_eq!(config.rounding, RoundingMode::HalfToEven);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "frequencies": "dayhoff", "rounding": "half_away_from_zero" }"#;
        let config: PamConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.frequencies, FrequencySource::Dayhoff);
        assert_eq!(config.rounding, RoundingMode::HalfAwayFromZero);
        assert_eq!(config.log_base, 10.0);
        assert_eq!(config.delimiter, Delimiter::Whitespace);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let json = r#"{ "frequncies": "dayhoff" }"#;
        assert!(serde_json::from_str::<PamConfig>(json).is_err());
    }

    #[test]
    fn test_validate_ranges() {
        let config = PamConfig {
            scale_constant: 0.0,
            ..PamConfig::default()
        };
        assert!(matches!(config.validate(), Err(PamError::Value(_))));

        let config = PamConfig {
            log_base: 1.0,
            ..PamConfig::default()
        };
        assert!(matches!(config.validate(), Err(PamError::Value(_))));

        let config = PamConfig {
            comment_marker: String::new(),
            ..PamConfig::default()
        };
        assert!(matches!(config.validate(), Err(PamError::Value(_))));

        let config = PamConfig {
            delimiter: Delimiter::Char('-'),
            ..PamConfig::default()
        };
        assert!(matches!(config.validate(), Err(PamError::Value(_))));

        let config = PamConfig {
            delimiter: Delimiter::Char('#'),
            ..PamConfig::default()
        };
        assert!(matches!(config.validate(), Err(PamError::Value(_))));

        let config = PamConfig {
            delimiter: Delimiter::Char('#'),
            comment_marker: "//".to_string(),
            ..PamConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pam.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(PamConfig::load(&path), Err(PamError::Config(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(PamConfig::load(&missing), Err(PamError::Io { .. })));
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            Delimiter::Whitespace.split("  A  R\tN ").as_slice(),
            &["A", "R", "N"]
        );
        assert_eq!(Delimiter::Tab.split("\tA\tR\t N").as_slice(), &["A", "R", "N"]);
        assert_eq!(Delimiter::Char(',').split("A, 1,2").as_slice(), &["A", "1", "2"]);
        assert_eq!(Delimiter::Char(',').split(",A,R").as_slice(), &["", "A", "R"]);
        assert_eq!(Delimiter::Tab.split("A\t\t2").as_slice(), &["A", "", "2"]);
        assert!(Delimiter::Tab.split("   ").is_empty());

        let d: Delimiter = serde_json::from_str(r#"{"char": ";"}"#).unwrap();
        assert_eq!(d, Delimiter::Char(';'));
    }
}
