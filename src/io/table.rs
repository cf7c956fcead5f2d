use std::fmt;
use std::io::Read;

use csv::{
    ReaderBuilder,
    StringRecord,
};
use log::warn;
use serde::Serialize;

use crate::error::ParseError;

/// Tab-separated reader with quoting disabled (annotation attributes may
/// contain stray quotes) and ragged rows allowed, so short rows reach the
/// per-row validation instead of failing the whole read.
pub fn tsv_reader<R: Read>(
    reader: R,
    has_headers: bool,
) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// Iterates over data rows paired with their 1-based line numbers.
///
/// Rows that are not valid UTF-8 are reported and skipped; any other reader
/// error ends the iteration with an error.
pub fn numbered_rows<'r, R: Read + 'r>(
    reader: &'r mut csv::Reader<R>,
    table: &'static str,
) -> impl Iterator<Item = Result<(u64, StringRecord), ParseError>> + 'r {
    reader
        .records()
        .enumerate()
        .filter_map(move |(idx, res)| {
            match res {
                Ok(record) => {
                    let line = record
                        .position()
                        .map(|p| p.line())
                        .unwrap_or(idx as u64 + 1);
                    Some(Ok((line, record)))
                },
                Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    warn!("{}: skipping row with invalid UTF-8 ({})", table, err);
                    None
                },
                Err(err) => Some(Err(err.into())),
            }
        })
}

/// Row accounting for one loaded table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Data rows seen (comments and headers excluded).
    pub rows:     u64,
    /// Rows parsed and retained in the index.
    pub kept:     u64,
    /// Rows rejected as malformed.
    pub skipped:  u64,
    /// Well-formed rows dropped by a filter (eligibility, duplicates).
    pub filtered: u64,
}

impl TableStats {
    pub(crate) fn reject(
        &mut self,
        err: &ParseError,
    ) {
        warn!("{}", err);
        self.skipped += 1;
    }
}

impl fmt::Display for TableStats {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} rows, {} kept, {} malformed, {} filtered",
            self.rows, self.kept, self.skipped, self.filtered
        )
    }
}
