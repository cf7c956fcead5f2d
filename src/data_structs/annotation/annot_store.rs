use std::collections::VecDeque;
use std::io::Read;

use arcstr::ArcStr;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use log::{debug, info, warn};
use multimap::MultiMap;
use serde::Serialize;

use super::gff_entry::{FeatureRecord, ANNOTATION_TABLE, GFF_FIELDS};
use crate::data_structs::coords::CdsIntervalSet;
use crate::data_structs::enums::{FeatureType, Strand};
use crate::data_structs::typedef::{IdStr, PosType};
use crate::error::ParseError;
use crate::io::{numbered_rows, tsv_reader, TableStats};
use crate::utils::gene_key;

const FASTA_DIRECTIVE: &str = "##FASTA";

/// Chromosome, span and strand of a gene as seen in the annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneBounds {
    pub chromosome: ArcStr,
    pub start:      PosType,
    pub end:        PosType,
    pub strand:     Strand,
}

/// A member of a gene's feature set that disagrees with the gene record on
/// chromosome or strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInconsistency {
    pub gene_id:           IdStr,
    pub feature_id:        Option<IdStr>,
    pub feature_type:      FeatureType,
    pub expected_chr:      ArcStr,
    pub expected_strand:   Strand,
    pub found_chr:         ArcStr,
    pub found_strand:      Strand,
}

/// Feature annotation indexed by gene identifier.
///
/// A record belongs to gene `G` when its `ID` or one of its `Parent` values
/// is `G`, either in full or by gene token (see
/// [`gene_key`](crate::utils::gene_key)), or when one of its ancestors in
/// the `Parent` -> `ID` graph belongs to `G`. Any `ID` in the annotation is
/// therefore a valid lookup key, transcripts included.
#[derive(Debug, Default)]
pub struct AnnotationIndex {
    records:         Vec<FeatureRecord>,
    id_map:          HashMap<IdStr, usize>,
    children_map:    MultiMap<IdStr, usize>,
    gene_map:        HashMap<IdStr, Vec<usize>>,
    n_genes:         usize,
    inconsistencies: Vec<FeatureInconsistency>,
}

fn upper(id: &str) -> IdStr { IdStr::from(id.to_ascii_uppercase().as_str()) }

impl AnnotationIndex {
    pub fn new() -> Self { Self::default() }

    /// Reads a tab-separated, GFF-like annotation.
    ///
    /// Comment and directive lines are ignored and reading stops at
    /// `##FASTA`. Malformed rows are logged and skipped; the load fails only
    /// when no row has the nine required columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<(Self, TableStats), ParseError> {
        let mut csv_reader = tsv_reader(reader, false);
        let mut stats = TableStats::default();
        let mut wide_rows = 0u64;
        let mut records = Vec::new();

        for row in numbered_rows(&mut csv_reader, ANNOTATION_TABLE) {
            let (line, row) = row?;
            let first = row.get(0).unwrap_or_default();
            if first.starts_with(FASTA_DIRECTIVE) {
                debug!("{}: sequence section at line {}, stopping", ANNOTATION_TABLE, line);
                break;
            }
            if first.starts_with('#') || (row.len() == 1 && first.trim().is_empty()) {
                continue;
            }

            stats.rows += 1;
            if row.len() >= GFF_FIELDS {
                wide_rows += 1;
            }
            match FeatureRecord::parse_row(&row, line) {
                Ok(record) => records.push(record),
                Err(err) => stats.reject(&err),
            }
        }

        if stats.rows > 0 && wide_rows == 0 {
            return Err(ParseError::NoUsableRows {
                table:    ANNOTATION_TABLE,
                rows:     stats.rows,
                expected: GFF_FIELDS,
            });
        }

        stats.kept = records.len() as u64;
        let index = Self::from_iter(records);
        info!(
            "Loaded annotation: {} ({} genes indexed)",
            stats,
            index.n_genes
        );
        Ok((index, stats))
    }

    fn build(records: Vec<FeatureRecord>) -> Self {
        let mut id_map = HashMap::with_capacity(records.len());
        let mut children_map = MultiMap::new();
        let mut gene_map: HashMap<IdStr, Vec<usize>> = HashMap::new();

        for (idx, record) in records.iter().enumerate() {
            if let Some(id) = record.id() {
                id_map.entry(upper(id)).or_insert(idx);
            }
            for parent in record.attributes().parents() {
                children_map.insert(upper(parent), idx);
            }
            for key in record
                .attributes()
                .identifiers()
                .flat_map(|id| [Some(upper(id)), gene_key(id)])
                .flatten()
                .unique()
            {
                gene_map.entry(key).or_default().push(idx);
            }
        }

        // Pull in descendants whose own identifiers do not carry the gene
        // token.
        for members in gene_map.values_mut() {
            let mut seen: HashSet<usize> = members.iter().copied().collect();
            let mut queue: VecDeque<usize> = members.iter().copied().collect();
            while let Some(idx) = queue.pop_front() {
                let Some(id) = records[idx].id() else {
                    continue;
                };
                if let Some(children) = children_map.get_vec(&upper(id)) {
                    for &child in children {
                        if seen.insert(child) {
                            members.push(child);
                            queue.push_back(child);
                        }
                    }
                }
            }
            members.sort_unstable_by_key(|&i| {
                (records[i].start(), records[i].end(), i)
            });
        }

        // Genes are the roots of the Parent graph: records without a parent,
        // and parents that never appear as an ID.
        let n_genes = records
            .iter()
            .flat_map(|record| {
                let parents = record.attributes().parents();
                if parents.is_empty() {
                    record.id().into_iter().collect_vec()
                }
                else {
                    parents
                        .iter()
                        .filter(|p| !id_map.contains_key(&upper(p)))
                        .collect_vec()
                }
            })
            .filter_map(|id| gene_key(id))
            .unique()
            .count();

        let mut index = Self {
            records,
            id_map,
            children_map,
            gene_map,
            n_genes,
            inconsistencies: Vec::new(),
        };
        index.inconsistencies = index.check_consistency();
        index
    }

    /// Every member of a gene's feature set must share chromosome and strand
    /// with the gene-type record. Violations are kept and reported.
    fn check_consistency(&self) -> Vec<FeatureInconsistency> {
        let mut found = Vec::new();
        for (gene_id, members) in self
            .gene_map
            .iter()
            .sorted_unstable_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()))
        {
            let Some(gene) = members
                .iter()
                .map(|&i| &self.records[i])
                .find(|r| {
                    *r.feature_type() == FeatureType::Gene
                        && r.id().map(|id| upper(id) == *gene_id).unwrap_or(false)
                })
            else {
                continue;
            };

            for record in members.iter().map(|&i| &self.records[i]) {
                if record.chromosome() != gene.chromosome()
                    || record.strand() != gene.strand()
                {
                    warn!(
                        "Feature {} ({}) of gene {} is at {} but the gene is at {}",
                        record.id().map(|s| s.as_str()).unwrap_or("<no ID>"),
                        record.feature_type(),
                        gene_id,
                        record.contig(),
                        gene.contig()
                    );
                    found.push(FeatureInconsistency {
                        gene_id:         gene_id.clone(),
                        feature_id:      record.id().cloned(),
                        feature_type:    record.feature_type().clone(),
                        expected_chr:    gene.chromosome().clone(),
                        expected_strand: gene.strand(),
                        found_chr:       record.chromosome().clone(),
                        found_strand:    record.strand(),
                    });
                }
            }
        }
        found
    }

    fn members(
        &self,
        gene_id: &str,
    ) -> impl Iterator<Item = &FeatureRecord> {
        self.gene_map
            .get(&upper(gene_id))
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    /// Records belonging to `gene_id`, ordered by position, optionally
    /// restricted to `types`. Unknown genes yield an empty list.
    pub fn get_features(
        &self,
        gene_id: &str,
        types: Option<&[FeatureType]>,
    ) -> Vec<&FeatureRecord> {
        self.members(gene_id)
            .filter(|r| {
                types
                    .map(|t| t.contains(r.feature_type()))
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Union of the gene's CDS ranges.
    pub fn get_cds_intervals(
        &self,
        gene_id: &str,
    ) -> CdsIntervalSet {
        CdsIntervalSet::from_ranges(
            self.members(gene_id)
                .filter(|r| *r.feature_type() == FeatureType::Cds)
                .map(|r| (r.start(), r.end())),
        )
    }

    /// Span of every feature of the gene. Chromosome and strand come from
    /// the gene-type record when present, otherwise from the first member.
    pub fn get_gene_bounds(
        &self,
        gene_id: &str,
    ) -> Option<GeneBounds> {
        let members = self.members(gene_id).collect_vec();
        let anchor = members
            .iter()
            .find(|r| *r.feature_type() == FeatureType::Gene)
            .or(members.first())?;
        let (start, end) = members
            .iter()
            .fold((PosType::MAX, PosType::MIN), |(s, e), r| {
                (s.min(r.start()), e.max(r.end()))
            });
        Some(GeneBounds {
            chromosome: anchor.chromosome().clone(),
            start,
            end,
            strand: anchor.strand(),
        })
    }

    pub fn contains_gene(
        &self,
        gene_id: &str,
    ) -> bool {
        self.gene_map.contains_key(&upper(gene_id))
    }

    /// Record with the given `ID` attribute (case-insensitive).
    pub fn get_by_id(
        &self,
        id: &str,
    ) -> Option<&FeatureRecord> {
        self.id_map
            .get(&upper(id))
            .map(|&i| &self.records[i])
    }

    /// Direct children of the record with the given `ID`.
    pub fn get_children(
        &self,
        id: &str,
    ) -> Vec<&FeatureRecord> {
        self.children_map
            .get_vec(&upper(id))
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
            .collect()
    }

    pub fn inconsistencies(&self) -> &[FeatureInconsistency] { &self.inconsistencies }

    pub fn records(&self) -> &[FeatureRecord] { &self.records }

    /// Number of distinct genes, counted on the roots of the `Parent` graph.
    pub fn n_genes(&self) -> usize { self.n_genes }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }
}

impl FromIterator<FeatureRecord> for AnnotationIndex {
    fn from_iter<T: IntoIterator<Item = FeatureRecord>>(iter: T) -> Self {
        Self::build(iter.into_iter().collect())
    }
}
