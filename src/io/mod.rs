//! Reading the input tables.
//!
//! Parsers take any [`std::io::Read`]; this module adds the shared
//! tab-separated reader setup and loading straight from files, where the
//! three tables are parsed concurrently.

mod compression;
mod table;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
pub use compression::Compression;
use log::debug;
pub use table::{numbered_rows, tsv_reader, TableStats};

use crate::config::EngineConfig;
use crate::data_structs::annotation::AnnotationIndex;
use crate::data_structs::insertion::{InsertionRegistry, LocationIndex};
use crate::engine::EngineHandle;

/// Opens `path` for reading, decompressing it if its extension asks for
/// it.
pub fn open_table<P: AsRef<Path>>(path: P) -> anyhow::Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Could not open {}", path.display()))?;
    let compression = Compression::from_path(path);
    debug!("Opening {} (compression: {})", path.display(), compression.name());
    Ok(Box::new(BufReader::new(compression.get_decoder(file))))
}

/// Loads an [`EngineHandle`] from three table files.
///
/// Each table is parsed into its own index on a separate rayon task.
pub fn load_from_paths<A, C, L>(
    annotation: A,
    confirmed: C,
    locations: L,
    config: EngineConfig,
) -> anyhow::Result<EngineHandle>
where
    A: AsRef<Path>,
    C: AsRef<Path>,
    L: AsRef<Path>, {
    let annotation = annotation.as_ref();
    let confirmed = confirmed.as_ref();
    let locations = locations.as_ref();

    let (annotation_res, (registry_res, locations_res)) = rayon::join(
        || {
            AnnotationIndex::from_reader(open_table(annotation)?)
                .with_context(|| format!("Failed to load annotation {}", annotation.display()))
        },
        || {
            rayon::join(
                || {
                    InsertionRegistry::from_reader(open_table(confirmed)?, &config.eligibility)
                        .with_context(|| {
                            format!("Failed to load confirmed insertions {}", confirmed.display())
                        })
                },
                || {
                    LocationIndex::from_reader(open_table(locations)?, &config.locations)
                        .with_context(|| {
                            format!("Failed to load insertion locations {}", locations.display())
                        })
                },
            )
        },
    );

    Ok(EngineHandle::from_parts(
        annotation_res?,
        registry_res?,
        locations_res?,
        config,
    ))
}
