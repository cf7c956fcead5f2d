//! Load-time configuration of the engine.
//!
//! Every setting is fixed once [`EngineHandle::load_all`] returns; none of
//! them can be changed per query. The defaults reproduce the published
//! eligibility rules and the column layout of the coordinate table.
//!
//! [`EngineHandle::load_all`]: crate::engine::EngineHandle::load_all

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::data_structs::enums::FeatureType;
use crate::with_field_fn;

/// Which confirmed insertions are retained by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    /// Required value of the `Hit region` column.
    pub hit_region:            String,
    /// Accepted values of the `HM` column.
    pub homozygous_statuses:   Vec<String>,
    /// Rejected value of the `ABRC` column.
    pub excluded_stock_status: String,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            hit_region:            "Exon".to_string(),
            homozygous_statuses:   vec!["HMc".to_string(), "HMn".to_string()],
            excluded_stock_status: "NotSent".to_string(),
        }
    }
}

impl EligibilityPolicy {
    with_field_fn!(hit_region, String);

    with_field_fn!(homozygous_statuses, Vec<String>);

    with_field_fn!(excluded_stock_status, String);

    pub fn is_eligible(
        &self,
        hit_region: &str,
        homozygosity_status: &str,
        stock_center_status: &str,
    ) -> bool {
        hit_region == self.hit_region
            && self
                .homozygous_statuses
                .iter()
                .any(|s| s == homozygosity_status)
            && stock_center_status != self.excluded_stock_status
    }
}

/// 0-based column positions of the headerless coordinate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationLayout {
    pub label_column:      usize,
    pub position_column:   usize,
    /// When set, locations carry a chromosome and must sit on the gene's
    /// chromosome to match.
    pub chromosome_column: Option<usize>,
}

impl Default for LocationLayout {
    fn default() -> Self {
        Self {
            label_column:      0,
            position_column:   4,
            chromosome_column: None,
        }
    }
}

impl LocationLayout {
    with_field_fn!(label_column, usize);

    with_field_fn!(position_column, usize);

    with_field_fn!(chromosome_column, Option<usize>);

    /// Fields a row needs for every configured column to be present.
    pub fn min_fields(&self) -> usize {
        self.label_column
            .max(self.position_column)
            .max(self.chromosome_column.unwrap_or(0))
            + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub eligibility:          EligibilityPolicy,
    pub locations:            LocationLayout,
    /// Feature types reported in visualization bundles.
    pub bundle_feature_types: Vec<FeatureType>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eligibility:          EligibilityPolicy::default(),
            locations:            LocationLayout::default(),
            bundle_feature_types: vec![
                FeatureType::Cds,
                FeatureType::FivePrimeUtr,
                FeatureType::ThreePrimeUtr,
                FeatureType::Exon,
            ],
        }
    }
}

impl EngineConfig {
    with_field_fn!(eligibility, EligibilityPolicy);

    with_field_fn!(locations, LocationLayout);

    with_field_fn!(bundle_feature_types, Vec<FeatureType>);

    /// Reads a JSON document; omitted fields keep their defaults.
    pub fn from_json_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Could not open config {}", path.display()))?;
        Self::from_json_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Exon", "HMc", "Sent", true)]
    #[case("Exon", "HMn", "Sent", true)]
    #[case("Exon", "HMc", "", true)]
    #[case("Intron", "HMc", "Sent", false)]
    #[case("exon", "HMc", "Sent", false)]
    #[case("Exon", "HEc", "Sent", false)]
    #[case("Exon", "HMc", "NotSent", false)]
    fn test_default_eligibility(
        #[case] hit: &str,
        #[case] hm: &str,
        #[case] abrc: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(
            EligibilityPolicy::default().is_eligible(hit, hm, abrc),
            expected
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_reader(
            r#"{"locations": {"chromosome_column": 2}}"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(config.eligibility, EligibilityPolicy::default());
        assert_eq!(config.locations.position_column, 4);
        assert_eq!(config.locations.chromosome_column, Some(2));
        assert_eq!(config.locations.min_fields(), 5);
        assert_eq!(config.bundle_feature_types.len(), 4);
    }

    #[test]
    fn test_json_feature_types() {
        let config = EngineConfig::from_json_reader(
            r#"{"bundle_feature_types": ["CDS", "intron"]}"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(
            config.bundle_feature_types,
            vec![FeatureType::Cds, FeatureType::Other("intron".into())]
        );
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(EngineConfig::from_json_reader("{".as_bytes()).is_err());
    }

    #[test]
    fn test_builders() {
        let config = EngineConfig::default().with_locations(
            LocationLayout::default()
                .with_label_column(1)
                .with_position_column(2)
                .with_chromosome_column(Some(6)),
        );
        assert_eq!(config.locations.min_fields(), 7);
    }
}
