mod annot_store;
mod gff_entry;

pub use annot_store::{AnnotationIndex, FeatureInconsistency, GeneBounds};
pub use gff_entry::{FeatureAttributes, FeatureRecord, GFF_FIELDS};
