pub use crate::config::{EligibilityPolicy, EngineConfig, LocationLayout};
pub use crate::data_structs::annotation::{
    AnnotationIndex,
    FeatureAttributes,
    FeatureInconsistency,
    FeatureRecord,
    GeneBounds,
};
pub use crate::data_structs::coords::{CdsIntervalSet, Contig};
pub use crate::data_structs::enums::{FeatureType, Strand};
pub use crate::data_structs::insertion::{
    extract_primary_position,
    ConfirmedInsertion,
    InsertionLocation,
    InsertionRegistry,
    LocationIndex,
};
pub use crate::data_structs::typedef::{IdStr, PosType};
pub use crate::engine::{EngineHandle, LoadReport};
pub use crate::error::{EngineError, ParseError};
pub use crate::io::{load_from_paths, open_table, TableStats};
pub use crate::tools::{
    FeatureView,
    GeneSummary,
    InsertionMatch,
    OverlapResolver,
    Resolution,
    ResolutionStatus,
    VisualizationBundle,
    VisualizationBundleBuilder,
};
