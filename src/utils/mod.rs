//! Helpers shared across the crate: builder/getter macros and the
//! identifier normalization rules used by every index.
//!
//! Identifier matching is always token based. Gene identifiers are looked up
//! both as the full `ID`/`Parent` value and as the token before the first
//! `.` (so `AT1G25320.1` also belongs to `AT1G25320`). Namespace prefixes
//! such as `gene:` stay part of the identifier. Line labels are compared as
//! whole leading token sequences. Plain substring matching is never used.

use crate::data_structs::typedef::IdStr;
use crate::error::EngineError;

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;

/// Separator between a gene identifier and its isoform/sub-feature suffix.
pub const GENE_ID_DELIMITERS: &[char] = &['.'];

/// Separators inside insertion line labels.
pub const LINE_LABEL_DELIMITERS: &[char] = &['.', '-', ':', ',', ';', '|', '/'];

fn is_label_delimiter(c: char) -> bool {
    c.is_whitespace() || LINE_LABEL_DELIMITERS.contains(&c)
}

/// Validates a caller-supplied gene identifier and uppercases it.
///
/// Accepts ASCII alphanumerics and `._:-` only; whitespace anywhere
/// (including surrounding) is rejected rather than trimmed.
pub fn normalize_gene_id(raw: &str) -> Result<IdStr, EngineError> {
    let valid = !raw.is_empty()
        && raw.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-')
        });
    if !valid {
        return Err(EngineError::InvalidInput(raw.to_string()));
    }
    Ok(IdStr::from(raw.to_ascii_uppercase().as_str()))
}

/// Uppercased token of an annotation identifier that names its gene.
///
/// `AT1G25320.1-Protein` -> `AT1G25320`, `gene:AT1G01010` -> `GENE:AT1G01010`.
/// Returns `None` for identifiers with an empty leading token.
pub fn gene_key(identifier: &str) -> Option<IdStr> {
    let token = identifier
        .trim()
        .split(GENE_ID_DELIMITERS)
        .next()
        .unwrap_or_default();
    if token.is_empty() {
        None
    }
    else {
        Some(IdStr::from(token.to_ascii_uppercase().as_str()))
    }
}

/// Splits a line label into its non-empty tokens.
pub fn label_tokens(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(is_label_delimiter)
        .filter(|token| !token.is_empty())
}

/// True when the tokens of `line_id` equal the leading tokens of `label`,
/// compared case-insensitively.
///
/// `SALK_019496` matches `SALK_019496.1.x`; `SALK_1` does not match
/// `SALK_10`.
pub fn label_has_line_prefix(
    label: &str,
    line_id: &str,
) -> bool {
    let mut label_iter = label_tokens(label);
    let mut any = false;
    for wanted in label_tokens(line_id) {
        any = true;
        match label_iter.next() {
            Some(token) if token.eq_ignore_ascii_case(wanted) => {},
            _ => return false,
        }
    }
    any
}

/// Chromosome name comparison key: lowercase, optional `chr` prefix removed.
pub fn chromosome_key(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    match lower.strip_prefix("chr") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("AT1G25320", "AT1G25320")]
    #[case("at1g25320", "AT1G25320")]
    #[case("At1g25320.1", "AT1G25320.1")]
    fn test_normalize_gene_id_valid(
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(normalize_gene_id(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case(" AT1G25320")]
    #[case("AT1G 25320")]
    #[case("AT1G25320\t")]
    #[case("AT1G*")]
    fn test_normalize_gene_id_invalid(#[case] raw: &str) {
        assert!(matches!(
            normalize_gene_id(raw),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[rstest]
    #[case("AT1G25320", Some("AT1G25320"))]
    #[case("AT1G25320.1", Some("AT1G25320"))]
    #[case("at1g25320.1-Protein", Some("AT1G25320"))]
    #[case("gene:AT1G01010", Some("GENE:AT1G01010"))]
    #[case("CDS:AT1G01010.1", Some("CDS:AT1G01010"))]
    #[case(".1", None)]
    fn test_gene_key(
        #[case] identifier: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(gene_key(identifier).as_deref(), expected);
    }

    #[rstest]
    #[case("SALK_019496.1.x", "SALK_019496", true)]
    #[case("salk_019496.1.x", "SALK_019496", true)]
    #[case("SALK_019496", "SALK_019496", true)]
    #[case("SALK_10", "SALK_1", false)]
    #[case("SALK_10.1", "SALK_1", false)]
    #[case("SALK_1.0", "SALK_1", true)]
    #[case("XSALK_1", "SALK_1", false)]
    #[case("SAIL_12_A01.v1", "SAIL_12_A01", true)]
    #[case("SALK_019496", "SALK_019496.1", false)]
    #[case("SALK_019496", "", false)]
    fn test_label_has_line_prefix(
        #[case] label: &str,
        #[case] line_id: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(label_has_line_prefix(label, line_id), expected);
    }

    #[rstest]
    #[case("Chr1", "1")]
    #[case("chr1", "1")]
    #[case("1", "1")]
    #[case("ChrC", "c")]
    #[case("chr", "chr")]
    fn test_chromosome_key(
        #[case] name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(chromosome_key(name), expected);
    }
}
