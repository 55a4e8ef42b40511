//! Matrix Loader
//!
//! Reads a labelled 20×20 mutation probability table:
//!
//! ```text
//! # optional comments and title lines
//!    A    R    N ...    V
//! A  9867    1    4 ...   13
//! R     2 9913    1 ...    2
//! ...
//! ```
//!
//! The header is the first line whose fields are exactly the 20 residue
//! codes. Every following non-blank, non-comment line is a data row.
//! Probability entries are divided by the configured scale constant before
//! they are returned; `load_table` reads signed tables (written score
//! matrices) as-is.

use std::fs;
use std::path::Path;

use crate::alphabet::AminoAcidAlphabet;
use crate::config::PamConfig;
use crate::error::{PamError, Result};
use crate::matrix::Matrix;

/// Row-sum drift that triggers a stochasticity warning
const ROW_SUM_TOLERANCE: f64 = 0.05;

/// Load a probability matrix from disk
pub fn load(path: &Path, config: &PamConfig) -> Result<(AminoAcidAlphabet, Matrix)> {
    let text = fs::read_to_string(path).map_err(|e| PamError::io(path, e))?;
    parse(&text, &path.display().to_string(), config)
}

/// Parse probability matrix text already in memory; `source_name` labels errors
pub fn parse(text: &str, source_name: &str, config: &PamConfig) -> Result<(AminoAcidAlphabet, Matrix)> {
    let (alphabet, raw) = parse_rows(text, source_name, config, EntryKind::Probability)?;
    let matrix = raw.scaled_down(config.scale_constant);

    for (i, sum) in matrix.row_sums().into_iter().enumerate() {
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            tracing::warn!(
                "Row '{}' of {} sums to {:.4} after scaling (check scale_constant)",
                alphabet.label(i).unwrap_or('?'),
                source_name,
                sum
            );
        }
    }

    tracing::debug!("Loaded {}x{} matrix from {}", matrix.rows(), matrix.cols(), source_name);
    Ok((alphabet, matrix))
}

/// Load any labelled numeric table (score matrices included) without
/// rescaling or the non-negativity check
pub fn load_table(path: &Path, config: &PamConfig) -> Result<(AminoAcidAlphabet, Matrix)> {
    let text = fs::read_to_string(path).map_err(|e| PamError::io(path, e))?;
    parse_rows(&text, &path.display().to_string(), config, EntryKind::Signed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Probability,
    Signed,
}

fn parse_rows(
    text: &str,
    source_name: &str,
    config: &PamConfig,
    kind: EntryKind,
) -> Result<(AminoAcidAlphabet, Matrix)> {
    let marker = config.comment_marker.as_str();
    let is_skipped = |line: &str| line.is_empty() || line.starts_with(marker);

    let mut lines = text.lines().enumerate();

    // STEP 1: Locate the header
    let mut alphabet = None;
    for (idx, raw) in lines.by_ref() {
        let line = raw.trim();
        if is_skipped(line) {
            continue;
        }
        // The header's leading corner cell is empty with an exact delimiter
        let fields = config.delimiter.split(line);
        let labels = fields.iter().copied().filter(|f| !f.is_empty());
        if let Some(found) = AminoAcidAlphabet::from_header_fields(labels) {
            tracing::debug!("Header found on line {} of {}", idx + 1, source_name);
            alphabet = Some(found);
            break;
        }
    }
    let alphabet = alphabet.ok_or_else(|| {
        PamError::format(
            source_name,
            text.lines().count(),
            "no header row listing the 20 amino acid codes",
        )
    })?;
    let n = alphabet.len();

    // STEP 2: Parse data rows in file order
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut last_line = 0;
    for (idx, raw) in lines {
        let line_no = idx + 1;
        let line = raw.trim();
        if is_skipped(line) {
            continue;
        }

        if rows.len() == n {
            return Err(PamError::format(
                source_name,
                line_no,
                format!("data row {} found, but the alphabet has only {} residues", n + 1, n),
            ));
        }

        let fields = config.delimiter.split(line);
        let (label, values) = match fields.split_first() {
            Some(parts) => parts,
            None => continue,
        };

        let expected = alphabet.label(rows.len()).map(String::from);
        if expected.as_deref() != Some(*label) {
            return Err(PamError::format(
                source_name,
                line_no,
                format!(
                    "row label '{}' does not match header position {} ('{}')",
                    label,
                    rows.len() + 1,
                    expected.unwrap_or_default()
                ),
            ));
        }

        if values.len() < n {
            return Err(PamError::format(
                source_name,
                line_no,
                format!("row '{}' has {} values, expected {}", label, values.len(), n),
            ));
        }
        if values.len() > n {
            return Err(PamError::format(
                source_name,
                line_no,
                format!("row '{}' has {} values for a {}-column matrix", label, values.len(), n),
            ));
        }

        let row = values
            .iter()
            .map(|field| parse_entry(field, source_name, line_no, kind))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
        last_line = line_no;
    }

    if rows.len() != n {
        return Err(PamError::format(
            source_name,
            last_line.max(text.lines().count()),
            format!("found {} data rows, expected {}", rows.len(), n),
        ));
    }

    Ok((alphabet, Matrix::from_rows(rows)?))
}

fn parse_entry(field: &str, source_name: &str, line_no: usize, kind: EntryKind) -> Result<f64> {
    let value: f64 = field.parse().map_err(|_| {
        PamError::format(source_name, line_no, format!("'{}' is not a number", field))
    })?;

    if !value.is_finite() {
        return Err(PamError::format(
            source_name,
            line_no,
            format!("entry {} is not finite", field),
        ));
    }
    if kind == EntryKind::Probability && value < 0.0 {
        return Err(PamError::format(
            source_name,
            line_no,
            format!("entry {} is not a non-negative probability", field),
        ));
    }

    Ok(value)
}
