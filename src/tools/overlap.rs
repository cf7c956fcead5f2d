use arcstr::ArcStr;
use hashbrown::HashSet;
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::data_structs::annotation::AnnotationIndex;
use crate::data_structs::insertion::{
    ConfirmedInsertion,
    InsertionLocation,
    InsertionRegistry,
    LocationIndex,
};
use crate::data_structs::typedef::{IdStr, PosType};
use crate::error::EngineError;
use crate::utils::{chromosome_key, normalize_gene_id};

/// An eligible insertion line positioned inside a gene's coding sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertionMatch {
    pub line_id:             IdStr,
    pub chromosome:          ArcStr,
    pub position:            PosType,
    pub line_label:          String,
    pub target_gene:         IdStr,
    pub hit_region:          String,
    pub homozygosity_status: String,
    pub stock_center_status: String,
}

impl InsertionMatch {
    fn new(
        insertion: &ConfirmedInsertion,
        location: &InsertionLocation,
        gene_chromosome: &ArcStr,
    ) -> Self {
        Self {
            line_id:             insertion.line_id().clone(),
            chromosome:          location
                .chromosome
                .clone()
                .unwrap_or_else(|| gene_chromosome.clone()),
            position:            location.position,
            line_label:          location.line_label.clone(),
            target_gene:         insertion.target_gene().clone(),
            hit_region:          insertion.hit_region().clone(),
            homozygosity_status: insertion.homozygosity_status().clone(),
            stock_center_status: insertion.stock_center_status().clone(),
        }
    }
}

/// Why a resolution is empty, if it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Eligible lines and coding sequence were both present; matches may
    /// still be empty if no line falls inside the CDS.
    Resolved,
    /// No eligible confirmed insertion references the gene.
    NoEligibleLines,
    /// The gene has eligible lines but no CDS features in the annotation.
    NoCodingSequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub gene_id: IdStr,
    pub status:  ResolutionStatus,
    pub matches: Vec<InsertionMatch>,
}

impl Resolution {
    fn empty(
        gene_id: IdStr,
        status: ResolutionStatus,
    ) -> Self {
        Self {
            gene_id,
            status,
            matches: Vec::new(),
        }
    }

    /// Distinct line identifiers in match order.
    pub fn line_ids(&self) -> Vec<String> {
        self.matches
            .iter()
            .map(|m| m.line_id.to_string())
            .unique()
            .collect()
    }

    pub fn is_empty(&self) -> bool { self.matches.is_empty() }
}

/// Joins the three indexes: eligible lines of a gene whose recorded
/// position lies inside the gene's CDS.
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver<'a> {
    annotation: &'a AnnotationIndex,
    registry:   &'a InsertionRegistry,
    locations:  &'a LocationIndex,
}

impl<'a> OverlapResolver<'a> {
    pub fn new(
        annotation: &'a AnnotationIndex,
        registry: &'a InsertionRegistry,
        locations: &'a LocationIndex,
    ) -> Self {
        Self {
            annotation,
            registry,
            locations,
        }
    }

    /// Matches for `gene_id`, ordered by position then line id.
    ///
    /// A line recorded at several positions inside the CDS is reported once
    /// per distinct position. Unknown genes and genes without eligible lines
    /// give an empty resolution, never an error.
    pub fn resolve(
        &self,
        gene_id: &str,
    ) -> Result<Resolution, EngineError> {
        let gene_id = normalize_gene_id(gene_id)?;

        let eligible = self.registry.get_eligible_lines(&gene_id);
        if eligible.is_empty() {
            debug!("{}: no eligible insertion lines", gene_id);
            return Ok(Resolution::empty(gene_id, ResolutionStatus::NoEligibleLines));
        }

        let cds = self.annotation.get_cds_intervals(&gene_id);
        let Some(bounds) = self
            .annotation
            .get_gene_bounds(&gene_id)
            .filter(|_| !cds.is_empty())
        else {
            debug!(
                "{}: {} eligible lines but no coding sequence",
                gene_id,
                eligible.len()
            );
            return Ok(Resolution::empty(gene_id, ResolutionStatus::NoCodingSequence));
        };
        let gene_chr = chromosome_key(&bounds.chromosome);

        let mut seen: HashSet<(IdStr, PosType)> = HashSet::new();
        let mut matches = Vec::new();
        for insertion in eligible {
            for location in self.locations.resolve(insertion.line_id()) {
                if !cds.contains(location.position) {
                    continue;
                }
                if let Some(chr) = location.chromosome.as_ref() {
                    if chromosome_key(chr) != gene_chr {
                        continue;
                    }
                }
                if seen.insert((insertion.line_id().clone(), location.position)) {
                    matches.push(InsertionMatch::new(insertion, location, &bounds.chromosome));
                }
            }
        }
        matches.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.line_id.as_str().cmp(b.line_id.as_str()))
        });

        debug!(
            "{}: {} eligible lines, {} CDS intervals, {} matches",
            gene_id,
            eligible.len(),
            cds.len(),
            matches.len()
        );
        Ok(Resolution {
            gene_id,
            status: ResolutionStatus::Resolved,
            matches,
        })
    }
}
