//! Error taxonomy of the engine.
//!
//! Row-level [`ParseError`]s are reported and skipped during a load; only
//! structural problems (a required column set entirely absent) abort it.
//! Query operations return [`EngineError::InvalidInput`] for malformed gene
//! identifiers and [`EngineError::GeneNotFound`] only from the bundle
//! operation. Empty results are never errors.

use thiserror::Error;

/// Problems found while parsing one of the input tables.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{table} line {line}: expected at least {expected} fields, found {found}")]
    TooFewFields {
        table:    &'static str,
        line:     u64,
        expected: usize,
        found:    usize,
    },
    #[error("{table} line {line}: '{value}' is not a valid {field}")]
    InvalidInteger {
        table: &'static str,
        line:  u64,
        field: &'static str,
        value: String,
    },
    #[error("{table} line {line}: start {start} is greater than end {end}")]
    InvalidInterval {
        table: &'static str,
        line:  u64,
        start: u32,
        end:   u32,
    },
    #[error("{table} line {line}: required field '{field}' is empty")]
    EmptyField {
        table: &'static str,
        line:  u64,
        field: &'static str,
    },
    #[error("no numeric position prefix in '{0}'")]
    InvalidPosition(String),
    #[error("{table}: required columns missing from header: {}", .missing.join(", "))]
    MissingColumns {
        table:   &'static str,
        missing: Vec<String>,
    },
    #[error("{table}: none of {rows} rows has the required {expected} fields")]
    NoUsableRows {
        table:    &'static str,
        rows:     u64,
        expected: usize,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ParseError {
    /// Whether the error invalidates a whole table rather than one row.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ParseError::MissingColumns { .. }
                | ParseError::NoUsableRows { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid gene identifier {0:?}")]
    InvalidInput(String),
    #[error("gene {0} is not present in the annotation")]
    GeneNotFound(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
