//! Queries that join the annotation with the insertion tables.
//!
//! - [`OverlapResolver`]: eligible lines of a gene whose position falls in
//!   the gene's coding sequence.
//! - [`VisualizationBundleBuilder`]: gene bounds, selected features and
//!   resolved insertions, packaged for rendering.

mod bundle;
mod overlap;

pub use bundle::{FeatureView, GeneSummary, VisualizationBundle, VisualizationBundleBuilder};
pub use overlap::{InsertionMatch, OverlapResolver, Resolution, ResolutionStatus};
