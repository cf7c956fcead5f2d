//! This module defines data structures for representing genomic coordinates.
//!
//! - [`Contig`]: a genomic region, defined by a sequence name, closed 1-based
//!   start and end positions, and a strand.
//! - [`CdsIntervalSet`]: the merged, sorted set of closed intervals covered
//!   by a gene's coding sequence, with point membership queries.

mod contig;
mod interval_set;

pub use contig::Contig;
pub use interval_set::CdsIntervalSet;

#[cfg(test)]
mod tests;
