use std::io::Read;

use arcstr::ArcStr;
use hashbrown::HashMap;
use log::{debug, info};
use serde::Serialize;

use crate::config::LocationLayout;
use crate::data_structs::typedef::{IdStr, PosType};
use crate::error::ParseError;
use crate::io::{numbered_rows, tsv_reader, TableStats};
use crate::utils::{label_has_line_prefix, label_tokens};

pub(crate) const LOCATION_TABLE: &str = "insertion locations";

/// Separates the primary coordinate pair from the comparison part of a
/// compound position field.
const COMPARISON_SEPARATOR: &str = " vs ";

/// Position of an insertion from a compound coordinate field.
///
/// Takes the text before the first `" vs "`, then its first `-`-delimited
/// segment, and parses the leading digits of that segment:
/// `"8864721-8864722 vs 0-0"` gives `8864721`.
pub fn extract_primary_position(raw: &str) -> Result<PosType, ParseError> {
    let primary = raw
        .split(COMPARISON_SEPARATOR)
        .next()
        .unwrap_or_default();
    let first = primary
        .trim()
        .split('-')
        .next()
        .unwrap_or_default()
        .trim();
    let digits = first
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(first.len());
    first[..digits]
        .parse::<PosType>()
        .map_err(|_| ParseError::InvalidPosition(raw.to_string()))
}

/// One row of the coordinate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionLocation {
    pub line_label: String,
    pub chromosome: Option<ArcStr>,
    pub position:   PosType,
}

impl InsertionLocation {
    pub fn new(
        line_label: &str,
        chromosome: Option<&str>,
        position: PosType,
    ) -> Self {
        Self {
            line_label: line_label.trim().to_string(),
            chromosome: chromosome
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(ArcStr::from),
            position,
        }
    }

    /// Whether this label names `line_id` (exact leading token match).
    pub fn identifies(
        &self,
        line_id: &str,
    ) -> bool {
        label_has_line_prefix(&self.line_label, line_id)
    }

    fn parse_row(
        row: &csv::StringRecord,
        line: u64,
        layout: &LocationLayout,
    ) -> Result<Self, ParseError> {
        if row.len() < layout.min_fields() {
            return Err(ParseError::TooFewFields {
                table: LOCATION_TABLE,
                line,
                expected: layout.min_fields(),
                found: row.len(),
            });
        }
        let field = |i: usize| row.get(i).unwrap_or_default();
        let label = field(layout.label_column);
        if label.trim().is_empty() {
            return Err(ParseError::EmptyField {
                table: LOCATION_TABLE,
                line,
                field: "line label",
            });
        }
        let position = extract_primary_position(field(layout.position_column))?;
        Ok(Self::new(
            label,
            layout.chromosome_column.map(field),
            position,
        ))
    }
}

fn first_token_key(label: &str) -> Option<IdStr> {
    label_tokens(label)
        .next()
        .map(|t| IdStr::from(t.to_ascii_uppercase().as_str()))
}

/// Coordinate rows indexed by the first token of their line label.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    by_token: HashMap<IdStr, Vec<InsertionLocation>>,
    len:      usize,
}

impl LocationIndex {
    /// Reads the headerless, tab-separated coordinate table.
    ///
    /// Rows whose position field has no numeric prefix are dropped; the load
    /// fails only if no row has the columns required by `layout`.
    pub fn from_reader<R: Read>(
        reader: R,
        layout: &LocationLayout,
    ) -> Result<(Self, TableStats), ParseError> {
        let mut csv_reader = tsv_reader(reader, false);
        let mut stats = TableStats::default();
        let mut wide_rows = 0u64;
        let mut locations = Vec::new();

        for row in numbered_rows(&mut csv_reader, LOCATION_TABLE) {
            let (line, row) = row?;
            stats.rows += 1;
            if row.len() >= layout.min_fields() {
                wide_rows += 1;
            }
            match InsertionLocation::parse_row(&row, line, layout) {
                Ok(location) => locations.push(location),
                Err(ParseError::InvalidPosition(raw)) => {
                    debug!(
                        "{} line {}: no position in '{}', row dropped",
                        LOCATION_TABLE, line, raw
                    );
                    stats.skipped += 1;
                },
                Err(err) => stats.reject(&err),
            }
        }

        if stats.rows > 0 && wide_rows == 0 {
            return Err(ParseError::NoUsableRows {
                table:    LOCATION_TABLE,
                rows:     stats.rows,
                expected: layout.min_fields(),
            });
        }

        let index = Self::from_iter(locations);
        stats.kept = index.len() as u64;
        info!("Loaded insertion locations: {}", stats);
        Ok((index, stats))
    }

    /// All locations whose label names `line_id`, in table order.
    ///
    /// The label must start with the full token sequence of `line_id`, so
    /// `SALK_019496.1.x` resolves `SALK_019496` while `SALK_10` never
    /// resolves `SALK_1`.
    pub fn resolve(
        &self,
        line_id: &str,
    ) -> Vec<&InsertionLocation> {
        let Some(key) = first_token_key(line_id) else {
            return Vec::new();
        };
        self.by_token
            .get(&key)
            .into_iter()
            .flatten()
            .filter(|loc| loc.identifies(line_id))
            .collect()
    }

    pub fn len(&self) -> usize { self.len }

    pub fn is_empty(&self) -> bool { self.len == 0 }
}

impl FromIterator<InsertionLocation> for LocationIndex {
    fn from_iter<T: IntoIterator<Item = InsertionLocation>>(iter: T) -> Self {
        let mut index = Self::default();
        for location in iter {
            let Some(key) = first_token_key(&location.line_label) else {
                continue;
            };
            index.by_token.entry(key).or_default().push(location);
            index.len += 1;
        }
        index
    }
}
