//! Insertion-side tables: the confirmed-insertion registry, which decides
//! eligibility, and the coordinate index, which maps line identifiers to
//! genomic positions.

mod confirmed;
mod location;

pub use confirmed::{
    ConfirmedInsertion,
    InsertionRegistry,
    HIT_REGION_COLUMN,
    HM_COLUMN,
    LINE_COLUMN,
    STOCK_CENTER_COLUMN,
    TARGET_GENE_COLUMN,
};
pub use location::{extract_primary_position, InsertionLocation, LocationIndex};

#[cfg(test)]
mod tests;
