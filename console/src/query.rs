use std::io::Write;
use std::path::PathBuf;
use std::process::exit;

use clap::Args;
use console::style;
use itertools::Itertools;
use log::info;
use tdnaxplorer::prelude::*;

use crate::strings::{input as input_strings, query as strings};
use crate::utils::{init_sink, validate_input};
use crate::PipelineCommand;

/// The three tables every query loads.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(short, long, required = true, help = input_strings::ANNOTATION)]
    annotation: PathBuf,

    #[arg(short, long, required = true, help = input_strings::CONFIRMED)]
    confirmed: PathBuf,

    #[arg(short, long, required = true, help = input_strings::LOCATIONS)]
    locations: PathBuf,

    #[arg(long, help = input_strings::CONFIG)]
    config: Option<PathBuf>,
}

impl InputArgs {
    pub fn load(&self) -> anyhow::Result<EngineHandle> {
        for path in [&self.annotation, &self.confirmed, &self.locations]
            .into_iter()
            .chain(self.config.as_ref())
        {
            validate_input(path)?;
        }
        let config = match &self.config {
            Some(path) => EngineConfig::from_json_path(path)?,
            None => EngineConfig::default(),
        };
        let engine = load_from_paths(
            &self.annotation,
            &self.confirmed,
            &self.locations,
            config,
        )?;
        info!("Load report:\n{}", engine.load_report());
        Ok(engine)
    }
}

#[derive(Args, Debug, Clone)]
pub struct LinesArgs {
    #[arg(help = strings::GENE)]
    gene: String,

    #[clap(flatten)]
    input: InputArgs,
}

impl PipelineCommand for LinesArgs {
    fn run(&self) -> anyhow::Result<()> {
        let engine = self.input.load()?;
        let lines = engine.tdna_lines(&self.gene)?;
        if lines.is_empty() {
            eprintln!(
                "No eligible insertion lines inside the CDS of {}.",
                style(&self.gene).yellow()
            );
        }
        for line in lines {
            println!("{}", line);
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct DetailsArgs {
    #[arg(help = strings::GENE)]
    gene: String,

    #[arg(short, long, help = strings::OUTPUT)]
    output: Option<PathBuf>,

    #[clap(flatten)]
    input: InputArgs,
}

impl PipelineCommand for DetailsArgs {
    fn run(&self) -> anyhow::Result<()> {
        let engine = self.input.load()?;
        let resolution = engine.resolve(&self.gene)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(init_sink(self.output.as_ref())?);
        for insertion in resolution.matches.iter() {
            writer.serialize(insertion)?;
        }
        writer.flush()?;

        eprintln!(
            "{}: {} ({} matches from {} lines)",
            style(resolution.gene_id.as_str()).blue(),
            style(format!("{:?}", resolution.status)).green(),
            resolution.matches.len(),
            resolution.matches.iter().map(|m| &m.line_id).unique().count()
        );
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct BundleArgs {
    #[arg(help = strings::GENE)]
    gene: String,

    #[arg(short, long, help = strings::OUTPUT)]
    output: Option<PathBuf>,

    #[clap(flatten)]
    input: InputArgs,
}

impl PipelineCommand for BundleArgs {
    fn run(&self) -> anyhow::Result<()> {
        let engine = self.input.load()?;
        let bundle = match engine.visualization_bundle(&self.gene) {
            Ok(bundle) => bundle,
            Err(EngineError::GeneNotFound(gene)) => {
                eprintln!(
                    "Error: gene {} is not present in the annotation.",
                    style(gene).red()
                );
                exit(1);
            },
            Err(err) => return Err(err.into()),
        };

        let mut sink = init_sink(self.output.as_ref())?;
        serde_json::to_writer_pretty(&mut sink, &bundle)?;
        writeln!(sink)?;
        sink.flush()?;
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[arg(long, default_value_t = false, help = strings::JSON)]
    json: bool,

    #[clap(flatten)]
    input: InputArgs,
}

impl PipelineCommand for SummaryArgs {
    fn run(&self) -> anyhow::Result<()> {
        let engine = self.input.load()?;
        let report = engine.load_report();
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        println!("{}", report);
        for inconsistency in engine.annotation().inconsistencies() {
            println!(
                "{} {} ({}) at {}:{} but gene at {}:{}",
                style("inconsistent").yellow(),
                inconsistency
                    .feature_id
                    .as_ref()
                    .map(|id| id.as_str())
                    .unwrap_or(inconsistency.gene_id.as_str()),
                inconsistency.feature_type,
                inconsistency.found_chr,
                inconsistency.found_strand,
                inconsistency.expected_chr,
                inconsistency.expected_strand
            );
        }
        Ok(())
    }
}
