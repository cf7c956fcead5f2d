use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use clap::Args;
use console::style;
use log::LevelFilter;
use tdnaxplorer::exports::{pretty_env_logger, rayon};

use crate::strings::utils as strings;

#[derive(Args, Debug, Clone)]
pub struct UtilsArgs {
    #[arg(short, long, action = clap::ArgAction::Count, help = strings::VERBOSE)]
    pub verbose: u8,

    #[arg(long, default_value_t = 3, help = strings::THREADS)]
    pub threads: usize,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        let mut builder = pretty_env_logger::formatted_builder();
        match std::env::var("RUST_LOG") {
            Ok(filters) => builder.parse_filters(&filters),
            Err(_) => builder.filter_level(level),
        };
        builder.try_init()?;

        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
        Ok(())
    }
}

pub fn validate_input(path: &Path) -> anyhow::Result<()> {
    ensure!(
        path.exists(),
        "Path {} does not exist.",
        style(path.display()).red()
    );
    ensure!(
        path.is_file(),
        "Path {} is not a file.",
        style(path.display()).red()
    );
    Ok(())
}

pub fn validate_output(path: &Path) -> anyhow::Result<()> {
    ensure!(
        !path.is_dir(),
        "Output {} is a directory.",
        style(path.display()).red()
    );
    Ok(())
}

/// Standard output, or a buffered file when `output` is set.
pub fn init_sink(output: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            validate_output(path)?;
            let file = File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        },
        None => Ok(Box::new(io::stdout().lock())),
    }
}
