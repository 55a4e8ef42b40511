//! Matrix Writer
//!
//! Serialises a labelled score matrix. The text layout mirrors the input
//! tables (header of residue codes, then one labelled row per residue) so
//! written files load back through the same parser.
//!
//! Output is rendered fully in memory, written to a hidden sibling file and
//! renamed over the target. A failed run never leaves a half-written table.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::alphabet::AminoAcidAlphabet;
use crate::config::Delimiter;
use crate::error::{PamError, Result};
use crate::scorer::ScoreMatrix;

/// File format of the written matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonTable<'a> {
    alphabet: &'a AminoAcidAlphabet,
    scores: Vec<&'a [i32]>,
}

/// Write `scores` to `path`, replacing any existing file
pub fn write(
    path: &Path,
    alphabet: &AminoAcidAlphabet,
    scores: &ScoreMatrix,
    format: OutputFormat,
    delimiter: Delimiter,
) -> Result<()> {
    let body = match format {
        OutputFormat::Text => render_text(alphabet, scores, delimiter)?,
        OutputFormat::Json => render_json(alphabet, scores)?,
    };
    write_atomic(path, body.as_bytes())?;
    tracing::debug!("Wrote {} bytes to {}", body.len(), path.display());
    Ok(())
}

/// Render the tabular text layout
pub fn render_text(
    alphabet: &AminoAcidAlphabet,
    scores: &ScoreMatrix,
    delimiter: Delimiter,
) -> Result<String> {
    check_shape(alphabet, scores)?;
    let n = alphabet.len();
    let mut out = String::new();

    match delimiter {
        Delimiter::Whitespace => {
            let width = (0..n)
                .flat_map(|i| scores.row(i).iter())
                .map(|v| v.to_string().len())
                .max()
                .unwrap_or(1);

            let header: Vec<String> = alphabet
                .labels()
                .iter()
                .map(|c| format!("{:>width$}", c, width = width))
                .collect();
            out.push_str(&format!("  {}\n", header.join(" ")));

            for (i, label) in alphabet.labels().iter().enumerate() {
                let row: Vec<String> = scores
                    .row(i)
                    .iter()
                    .map(|v| format!("{:>width$}", v, width = width))
                    .collect();
                out.push_str(&format!("{} {}\n", label, row.join(" ")));
            }
        }
        Delimiter::Tab | Delimiter::Char(_) => {
            let sep = match delimiter {
                Delimiter::Char(c) => c.to_string(),
                _ => "\t".to_string(),
            };

            let header: Vec<String> = alphabet.labels().iter().map(char::to_string).collect();
            out.push_str(&format!("{}{}\n", sep, header.join(sep.as_str())));

            for (i, label) in alphabet.labels().iter().enumerate() {
                let row: Vec<String> = scores.row(i).iter().map(i32::to_string).collect();
                out.push_str(&format!("{}{}{}\n", label, sep, row.join(sep.as_str())));
            }
        }
    }

    Ok(out)
}

/// Render `{ "alphabet": "ARND...", "scores": [[...], ...] }`
pub fn render_json(alphabet: &AminoAcidAlphabet, scores: &ScoreMatrix) -> Result<String> {
    check_shape(alphabet, scores)?;
    let table = JsonTable {
        alphabet,
        scores: (0..scores.size()).map(|i| scores.row(i)).collect(),
    };
    serde_json::to_string_pretty(&table)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| PamError::Value(format!("failed to serialise score matrix: {}", e)))
}

fn check_shape(alphabet: &AminoAcidAlphabet, scores: &ScoreMatrix) -> Result<()> {
    if alphabet.len() != scores.size() {
        return Err(PamError::Dimension(format!(
            "{}-letter alphabet for a {}x{} score matrix",
            alphabet.len(),
            scores.size(),
            scores.size()
        )));
    }
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path)?;

    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(PamError::io(path, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(PamError::io(path, e));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        PamError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
