use arcstr::ArcStr;
use serde::Serialize;

use super::overlap::{InsertionMatch, OverlapResolver, ResolutionStatus};
use crate::data_structs::annotation::{AnnotationIndex, FeatureRecord};
use crate::data_structs::enums::{FeatureType, Strand};
use crate::data_structs::typedef::{IdStr, PosType};
use crate::error::EngineError;
use crate::utils::normalize_gene_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneSummary {
    pub id:         IdStr,
    pub chromosome: ArcStr,
    pub start:      PosType,
    pub end:        PosType,
    pub strand:     Strand,
}

/// Rendering-neutral view of one annotation feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureView {
    pub id:           Option<IdStr>,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub source:       ArcStr,
    pub start:        PosType,
    pub end:          PosType,
    pub strand:       Strand,
    pub score:        Option<f64>,
    /// Reading frame offset, only meaningful for CDS rows.
    pub phase:        Option<u8>,
}

impl From<&FeatureRecord> for FeatureView {
    fn from(record: &FeatureRecord) -> Self {
        Self {
            id:           record.id().cloned(),
            feature_type: record.feature_type().clone(),
            source:       record.source().clone(),
            start:        record.start(),
            end:          record.end(),
            strand:       record.strand(),
            score:        record.score(),
            phase:        record.phase(),
        }
    }
}

/// Everything a renderer needs for one gene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationBundle {
    pub gene:                GeneSummary,
    pub features:            Vec<FeatureView>,
    pub insertions:          Vec<InsertionMatch>,
    /// Merged CDS intervals as `[start, end]` pairs.
    pub coding_sequence:     Vec<(PosType, PosType)>,
    /// Number of bases covered by `coding_sequence`.
    pub coding_length:       u64,
    pub has_coding_sequence: bool,
    pub status:              ResolutionStatus,
}

pub struct VisualizationBundleBuilder<'a> {
    annotation:    &'a AnnotationIndex,
    resolver:      OverlapResolver<'a>,
    feature_types: &'a [FeatureType],
}

impl<'a> VisualizationBundleBuilder<'a> {
    pub fn new(
        annotation: &'a AnnotationIndex,
        resolver: OverlapResolver<'a>,
        feature_types: &'a [FeatureType],
    ) -> Self {
        Self {
            annotation,
            resolver,
            feature_types,
        }
    }

    /// Fails with [`EngineError::GeneNotFound`] only when the annotation has
    /// no feature at all for the gene.
    pub fn build(
        &self,
        gene_id: &str,
    ) -> Result<VisualizationBundle, EngineError> {
        let gene_id = normalize_gene_id(gene_id)?;
        let bounds = self
            .annotation
            .get_gene_bounds(&gene_id)
            .ok_or_else(|| EngineError::GeneNotFound(gene_id.to_string()))?;

        let features = self
            .annotation
            .get_features(&gene_id, Some(self.feature_types))
            .into_iter()
            .map(FeatureView::from)
            .collect();
        let cds = self.annotation.get_cds_intervals(&gene_id);
        let resolution = self.resolver.resolve(&gene_id)?;

        Ok(VisualizationBundle {
            gene: GeneSummary {
                id:         gene_id,
                chromosome: bounds.chromosome,
                start:      bounds.start,
                end:        bounds.end,
                strand:     bounds.strand,
            },
            features,
            insertions: resolution.matches,
            coding_sequence: cds.intervals().to_vec(),
            coding_length: cds.covered(),
            has_coding_sequence: !cds.is_empty(),
            status: resolution.status,
        })
    }
}
