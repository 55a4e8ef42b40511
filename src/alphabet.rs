//! Amino Acid Alphabet
//!
//! Ordered set of the 20 standard residue codes. The order is taken from the
//! input file header and carried unchanged through scoring and output.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::error::{PamError, Result};

/// Conventional Dayhoff ordering of the 20 standard residues
pub const STANDARD_ORDER: [char; 20] = [
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
];

/// Ordered residue labels shared by the row and column axes of a matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidAlphabet {
    labels: Vec<char>,
    index: FxHashMap<char, usize>,
}

impl AminoAcidAlphabet {
    /// Build an alphabet from labels in file order
    ///
    /// The labels must be a permutation of the 20 standard residues.
    pub fn new(labels: Vec<char>) -> Result<Self> {
        if labels.len() != STANDARD_ORDER.len() {
            return Err(PamError::Dimension(format!(
                "alphabet has {} labels, expected {}",
                labels.len(),
                STANDARD_ORDER.len()
            )));
        }

        let mut index = FxHashMap::default();
        for (i, &label) in labels.iter().enumerate() {
            if !STANDARD_ORDER.contains(&label) {
                return Err(PamError::Value(format!(
                    "'{}' is not a standard amino acid code",
                    label
                )));
            }
            if index.insert(label, i).is_some() {
                return Err(PamError::Value(format!("duplicate amino acid label '{}'", label)));
            }
        }

        Ok(Self { labels, index })
    }

    /// Alphabet in the conventional A R N D ... V order
    pub fn standard() -> Self {
        let labels = STANDARD_ORDER.to_vec();
        let index = labels.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { labels, index }
    }

    /// Try to read a header row: every field a single standard residue code,
    /// 20 distinct codes in total. Returns `None` for anything else.
    pub fn from_header_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut labels = Vec::with_capacity(STANDARD_ORDER.len());
        for field in fields {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => labels.push(c),
                _ => return None,
            }
        }
        Self::new(labels).ok()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[char] {
        &self.labels
    }

    pub fn label(&self, i: usize) -> Option<char> {
        self.labels.get(i).copied()
    }

    /// Position of a residue code in this alphabet
    pub fn index_of(&self, label: char) -> Option<usize> {
        self.index.get(&label).copied()
    }
}

impl Serialize for AminoAcidAlphabet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let as_string: String = self.labels.iter().collect();
        serializer.serialize_str(&as_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order_lookup() {
        let alphabet = AminoAcidAlphabet::standard();
        assert_eq!(alphabet.len(), 20);
        assert_eq!(alphabet.index_of('A'), Some(0));
        assert_eq!(alphabet.index_of('V'), Some(19));
        assert_eq!(alphabet.index_of('B'), None);
        assert_eq!(alphabet.label(10), Some('L'));
    }

    #[test]
    fn test_custom_order_preserved() {
        let mut labels = STANDARD_ORDER.to_vec();
        labels.reverse();
        let alphabet = AminoAcidAlphabet::new(labels).unwrap();
        assert_eq!(alphabet.label(0), Some('V'));
        assert_eq!(alphabet.index_of('A'), Some(19));
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_codes() {
        let mut labels = STANDARD_ORDER.to_vec();
        labels[1] = 'A';
        assert!(matches!(AminoAcidAlphabet::new(labels), Err(PamError::Value(_))));

        let mut labels = STANDARD_ORDER.to_vec();
        labels[5] = 'X';
        assert!(matches!(AminoAcidAlphabet::new(labels), Err(PamError::Value(_))));

        assert!(matches!(
            AminoAcidAlphabet::new(vec!['A', 'R']),
            Err(PamError::Dimension(_))
        ));
    }

    #[test]
    fn test_header_fields() {
        let header = "A R N D C Q E G H I L K M F P S T W Y V";
        assert!(AminoAcidAlphabet::from_header_fields(header.split_whitespace()).is_some());

        // Data row, not a header
        let row = "A 9867 1 4";
        assert!(AminoAcidAlphabet::from_header_fields(row.split_whitespace()).is_none());

        // Multi-letter field
        let prose = "AR N D C Q E G H I L K M F P S T W Y V";
        assert!(AminoAcidAlphabet::from_header_fields(prose.split_whitespace()).is_none());
    }
}
