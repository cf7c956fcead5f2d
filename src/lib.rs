//! Finds confirmed T-DNA insertion lines that disrupt the coding sequence of
//! a gene.
//!
//! Three tab-separated tables are joined: a GFF-like feature annotation, a
//! table of confirmed insertions with their zygosity and stock status, and a
//! coordinate table that places each line on the genome. See
//! [`engine::EngineHandle`] for the query surface.
//!
//! ```no_run
//! use tdnaxplorer::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let engine = load_from_paths(
//!     "TAIR10_GFF3_genes.gff",
//!     "confirmed.tsv",
//!     "locations.tsv",
//!     EngineConfig::default(),
//! )?;
//! for line in engine.tdna_lines("AT1G25320")? {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_structs;
pub mod engine;
pub mod error;
pub mod exports;
pub mod io;
pub mod prelude;
pub mod tools;
pub mod utils;
