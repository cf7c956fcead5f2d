//! The loaded, immutable query surface.
//!
//! [`EngineHandle::load_all`] parses the three tables once; every query
//! afterwards borrows the handle immutably, so one handle can serve any
//! number of threads.

use std::fmt;
use std::io::Read;

use log::info;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::data_structs::annotation::AnnotationIndex;
use crate::data_structs::insertion::{InsertionRegistry, LocationIndex};
use crate::error::EngineError;
use crate::getter_fn;
use crate::io::TableStats;
use crate::tools::{
    InsertionMatch,
    OverlapResolver,
    Resolution,
    VisualizationBundle,
    VisualizationBundleBuilder,
};

/// Row accounting of a whole load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub annotation:      TableStats,
    pub confirmed:       TableStats,
    pub locations:       TableStats,
    pub genes_indexed:   usize,
    pub inconsistencies: usize,
}

impl fmt::Display for LoadReport {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{:<23}{}", "annotation:", self.annotation)?;
        writeln!(f, "{:<23}{}", "confirmed insertions:", self.confirmed)?;
        writeln!(f, "{:<23}{}", "insertion locations:", self.locations)?;
        writeln!(f, "{:<23}{}", "genes indexed:", self.genes_indexed)?;
        write!(f, "{:<23}{}", "inconsistent features:", self.inconsistencies)
    }
}

#[derive(Debug)]
pub struct EngineHandle {
    annotation: AnnotationIndex,
    registry:   InsertionRegistry,
    locations:  LocationIndex,
    config:     EngineConfig,
    report:     LoadReport,
}

impl EngineHandle {
    getter_fn!(annotation, AnnotationIndex);

    getter_fn!(registry, InsertionRegistry);

    getter_fn!(locations, LocationIndex);

    getter_fn!(config, EngineConfig);

    /// Parses the annotation, confirmed-insertion and location tables.
    ///
    /// Malformed rows are skipped and counted in [`LoadReport`]; only a
    /// table missing its required columns altogether fails the load.
    pub fn load_all<A, C, L>(
        annotation: A,
        confirmed: C,
        locations: L,
        config: EngineConfig,
    ) -> Result<Self, EngineError>
    where
        A: Read,
        C: Read,
        L: Read, {
        let (annotation, annotation_stats) = AnnotationIndex::from_reader(annotation)?;
        let (registry, confirmed_stats) =
            InsertionRegistry::from_reader(confirmed, &config.eligibility)?;
        let (locations, location_stats) =
            LocationIndex::from_reader(locations, &config.locations)?;
        Ok(Self::from_parts(
            (annotation, annotation_stats),
            (registry, confirmed_stats),
            (locations, location_stats),
            config,
        ))
    }

    /// Assembles a handle from tables that were parsed separately.
    pub fn from_parts(
        annotation: (AnnotationIndex, TableStats),
        registry: (InsertionRegistry, TableStats),
        locations: (LocationIndex, TableStats),
        config: EngineConfig,
    ) -> Self {
        let report = LoadReport {
            annotation:      annotation.1,
            confirmed:       registry.1,
            locations:       locations.1,
            genes_indexed:   annotation.0.n_genes(),
            inconsistencies: annotation.0.inconsistencies().len(),
        };
        info!(
            "Engine ready: {} genes, {} eligible insertions, {} locations",
            report.genes_indexed,
            registry.0.len(),
            locations.0.len()
        );
        Self {
            annotation: annotation.0,
            registry: registry.0,
            locations: locations.0,
            config,
            report,
        }
    }

    pub fn load_report(&self) -> &LoadReport { &self.report }

    pub fn resolver(&self) -> OverlapResolver<'_> {
        OverlapResolver::new(&self.annotation, &self.registry, &self.locations)
    }

    pub fn bundle_builder(&self) -> VisualizationBundleBuilder<'_> {
        VisualizationBundleBuilder::new(
            &self.annotation,
            self.resolver(),
            &self.config.bundle_feature_types,
        )
    }

    /// Full resolution of a gene, status included.
    pub fn resolve(
        &self,
        gene_id: &str,
    ) -> Result<Resolution, EngineError> {
        self.resolver().resolve(gene_id)
    }

    /// Identifiers of the eligible lines inside the gene's CDS.
    ///
    /// Unknown genes give an empty list.
    pub fn tdna_lines(
        &self,
        gene_id: &str,
    ) -> Result<Vec<String>, EngineError> {
        Ok(self.resolve(gene_id)?.line_ids())
    }

    pub fn tdna_line_details(
        &self,
        gene_id: &str,
    ) -> Result<Vec<InsertionMatch>, EngineError> {
        Ok(self.resolve(gene_id)?.matches)
    }

    /// Fails with [`EngineError::GeneNotFound`] when the gene is absent
    /// from the annotation.
    pub fn visualization_bundle(
        &self,
        gene_id: &str,
    ) -> Result<VisualizationBundle, EngineError> {
        self.bundle_builder().build(gene_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOT: &str = "\
Chr1\tTAIR10\tgene\t8863000\t8866500\t.\t+\t.\tID=AT1G25320
Chr1\tTAIR10\tCDS\t8863750\t8866120\t.\t+\t0\tParent=AT1G25320.1
Chr1\tTAIR10\texon\t8863000\t8866500\t.\t+\t.\tParent=AT1G25320.1
Chr1\tTAIR10\tmRNA\t8863000\t8866500\t.\t+\t.\tID=AT1G25320.1;Parent=AT1G25320
";

    const CONFIRMED: &str = "\
Target Gene\tT-DNA line\tHit region\tHM\tABRC
AT1G25320\tSALK_019496\tExon\tHMc\tSent
";

    const LOCATIONS: &str = "SALK_019496.1.x\tT-DNA\tChr1\t+\t8864721-8864722 vs 0-0\n";

    fn handle() -> EngineHandle {
        EngineHandle::load_all(
            ANNOT.as_bytes(),
            CONFIRMED.as_bytes(),
            LOCATIONS.as_bytes(),
            EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineHandle>();
    }

    #[test]
    fn test_operations() {
        let handle = handle();
        assert_eq!(handle.tdna_lines("AT1G25320").unwrap(), vec!["SALK_019496"]);
        assert_eq!(
            handle.tdna_line_details("at1g25320").unwrap()[0].position,
            8864721
        );
        assert!(handle.tdna_lines("AT1G20330").unwrap().is_empty());
        assert!(handle.tdna_line_details("AT1G20330").unwrap().is_empty());

        let bundle = handle.visualization_bundle("AT1G25320").unwrap();
        // mRNA and gene records are not among the default bundle types.
        assert_eq!(bundle.features.len(), 2);
        assert!(matches!(
            handle.visualization_bundle("AT1G20330"),
            Err(EngineError::GeneNotFound(_))
        ));
    }

    #[test]
    fn test_load_report() {
        let handle = handle();
        let report = handle.load_report();
        assert_eq!(report.annotation.kept, 4);
        assert_eq!(report.confirmed.kept, 1);
        assert_eq!(report.locations.kept, 1);
        assert_eq!(report.genes_indexed, 1);
        assert_eq!(report.inconsistencies, 0);
        assert!(report.to_string().contains("genes indexed:         1"));
    }

    #[test]
    fn test_load_report_columns_align() {
        let report = LoadReport {
            inconsistencies: 12,
            ..*handle().load_report()
        };
        let rendered = report.to_string();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        for line in lines {
            let (label, value) = line.split_at(23);
            assert!(label.trim_end().ends_with(':'), "{line:?}");
            assert!(!value.starts_with(' '), "{line:?}");
        }
        assert!(rendered.ends_with("inconsistent features: 12"));
    }

    #[test]
    fn test_missing_columns_abort_load() {
        let res = EngineHandle::load_all(
            ANNOT.as_bytes(),
            "Target Gene\tHM\nAT1G25320\tHMc\n".as_bytes(),
            LOCATIONS.as_bytes(),
            EngineConfig::default(),
        );
        assert!(matches!(res, Err(EngineError::Parse(err)) if err.is_fatal()));
    }

    #[test]
    fn test_shared_across_threads() {
        let handle = handle();
        std::thread::scope(|s| {
            let workers = (0..4)
                .map(|_| s.spawn(|| handle.tdna_lines("AT1G25320").unwrap()))
                .collect::<Vec<_>>();
            for worker in workers {
                assert_eq!(worker.join().unwrap(), vec!["SALK_019496"]);
            }
        });
    }
}
