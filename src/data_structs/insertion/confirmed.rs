use std::io::Read;

use csv::StringRecord;
use hashbrown::{HashMap, HashSet};
use log::{debug, info};
use serde::Serialize;

use crate::config::EligibilityPolicy;
use crate::data_structs::typedef::IdStr;
use crate::error::ParseError;
use crate::io::{numbered_rows, tsv_reader, TableStats};
use crate::getter_fn;

pub(crate) const CONFIRMED_TABLE: &str = "confirmed insertions";

pub const TARGET_GENE_COLUMN: &str = "Target Gene";
pub const LINE_COLUMN: &str = "T-DNA line";
pub const HIT_REGION_COLUMN: &str = "Hit region";
pub const HM_COLUMN: &str = "HM";
pub const STOCK_CENTER_COLUMN: &str = "ABRC";

const REQUIRED_COLUMNS: [&str; 5] = [
    TARGET_GENE_COLUMN,
    LINE_COLUMN,
    HIT_REGION_COLUMN,
    HM_COLUMN,
    STOCK_CENTER_COLUMN,
];

/// One row of the confirmed-insertion table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConfirmedInsertion {
    target_gene:         IdStr,
    line_id:             IdStr,
    hit_region:          String,
    homozygosity_status: String,
    stock_center_status: String,
}

impl ConfirmedInsertion {
    getter_fn!(target_gene, IdStr);

    getter_fn!(line_id, IdStr);

    getter_fn!(hit_region, String);

    getter_fn!(homozygosity_status, String);

    getter_fn!(stock_center_status, String);

    /// `target_gene` is stored uppercased; the other fields are kept as
    /// given (trimmed).
    pub fn new(
        target_gene: &str,
        line_id: &str,
        hit_region: &str,
        homozygosity_status: &str,
        stock_center_status: &str,
    ) -> Self {
        Self {
            target_gene:         IdStr::from(target_gene.trim().to_ascii_uppercase().as_str()),
            line_id:             IdStr::from(line_id.trim()),
            hit_region:          hit_region.trim().to_string(),
            homozygosity_status: homozygosity_status.trim().to_string(),
            stock_center_status: stock_center_status.trim().to_string(),
        }
    }

    pub fn is_eligible(
        &self,
        policy: &EligibilityPolicy,
    ) -> bool {
        policy.is_eligible(
            &self.hit_region,
            &self.homozygosity_status,
            &self.stock_center_status,
        )
    }
}

/// Positions of the required columns in the header.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    target_gene: usize,
    line_id:     usize,
    hit_region:  usize,
    hm:          usize,
    abrc:        usize,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, ParseError> {
        let clean = |h: &str| h.trim_start_matches('\u{feff}').trim().to_string();
        let names = header.iter().map(clean).collect::<Vec<_>>();
        let find = |name: &str| {
            names
                .iter()
                .position(|h| h == name)
                .or_else(|| names.iter().position(|h| h.eq_ignore_ascii_case(name)))
        };
        let positions = REQUIRED_COLUMNS.map(find);
        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(positions.iter())
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        match positions {
            [Some(target_gene), Some(line_id), Some(hit_region), Some(hm), Some(abrc)] => {
                Ok(Self {
                    target_gene,
                    line_id,
                    hit_region,
                    hm,
                    abrc,
                })
            },
            _ => {
                Err(ParseError::MissingColumns {
                    table: CONFIRMED_TABLE,
                    missing,
                })
            },
        }
    }

    fn min_fields(&self) -> usize {
        [self.target_gene, self.line_id, self.hit_region, self.hm, self.abrc]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }

    fn parse(
        &self,
        row: &StringRecord,
        line: u64,
    ) -> Result<ConfirmedInsertion, ParseError> {
        if row.len() < self.min_fields() {
            return Err(ParseError::TooFewFields {
                table: CONFIRMED_TABLE,
                line,
                expected: self.min_fields(),
                found: row.len(),
            });
        }
        let field = |i: usize| row.get(i).unwrap_or_default();
        for (idx, name) in [
            (self.target_gene, TARGET_GENE_COLUMN),
            (self.line_id, LINE_COLUMN),
        ] {
            if field(idx).trim().is_empty() {
                return Err(ParseError::EmptyField {
                    table: CONFIRMED_TABLE,
                    line,
                    field: name,
                });
            }
        }
        Ok(ConfirmedInsertion::new(
            field(self.target_gene),
            field(self.line_id),
            field(self.hit_region),
            field(self.hm),
            field(self.abrc),
        ))
    }
}

/// Eligible confirmed insertions indexed by target gene.
///
/// Eligibility is decided once, while loading; rows failing the policy are
/// never stored. For each gene a line is kept once, at its first eligible
/// row.
#[derive(Debug, Clone, Default)]
pub struct InsertionRegistry {
    by_gene: HashMap<IdStr, Vec<ConfirmedInsertion>>,
}

impl InsertionRegistry {
    /// Reads the tab-separated, headed confirmed-insertion table.
    pub fn from_reader<R: Read>(
        reader: R,
        policy: &EligibilityPolicy,
    ) -> Result<(Self, TableStats), ParseError> {
        let mut csv_reader = tsv_reader(reader, true);
        let columns = ColumnMap::from_header(csv_reader.headers()?)?;
        let mut stats = TableStats::default();
        let mut rows = Vec::new();

        for row in numbered_rows(&mut csv_reader, CONFIRMED_TABLE) {
            let (line, row) = row?;
            stats.rows += 1;
            match columns.parse(&row, line) {
                Ok(insertion) => rows.push(insertion),
                Err(err) => stats.reject(&err),
            }
        }

        let parsed = rows.len() as u64;
        let registry = Self::from_insertions(rows, policy);
        stats.kept = registry.len() as u64;
        stats.filtered = parsed - stats.kept;
        info!(
            "Loaded confirmed insertions: {} ({} genes with eligible lines)",
            stats,
            registry.n_genes()
        );
        Ok((registry, stats))
    }

    /// Builds a registry from already-parsed rows, applying `policy`.
    pub fn from_insertions<I>(
        insertions: I,
        policy: &EligibilityPolicy,
    ) -> Self
    where
        I: IntoIterator<Item = ConfirmedInsertion>, {
        let mut by_gene: HashMap<IdStr, Vec<ConfirmedInsertion>> = HashMap::new();
        let mut seen: HashSet<(IdStr, IdStr)> = HashSet::new();

        for insertion in insertions {
            if !insertion.is_eligible(policy) {
                continue;
            }
            let key = (
                insertion.target_gene.clone(),
                IdStr::from(insertion.line_id.to_ascii_uppercase().as_str()),
            );
            if !seen.insert(key) {
                debug!(
                    "Duplicate eligible row for {} / {}",
                    insertion.target_gene, insertion.line_id
                );
                continue;
            }
            by_gene
                .entry(insertion.target_gene.clone())
                .or_default()
                .push(insertion);
        }
        Self { by_gene }
    }

    /// Eligible rows for `gene_id` (case-insensitive), in file order.
    pub fn get_eligible_lines(
        &self,
        gene_id: &str,
    ) -> &[ConfirmedInsertion] {
        self.by_gene
            .get(&IdStr::from(gene_id.to_ascii_uppercase().as_str()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn n_genes(&self) -> usize { self.by_gene.len() }

    pub fn len(&self) -> usize { self.by_gene.values().map(Vec::len).sum() }

    pub fn is_empty(&self) -> bool { self.by_gene.is_empty() }
}
