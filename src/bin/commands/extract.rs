use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};
use tracing::info;

use pdb_contacts::IdMap;
use pdb_contacts::config::ExtractConfig;
use pdb_contacts::ops::{
    FileOutcome, Pipeline, RunSummary, discover, open_sink, structure_id_from_path,
};

use crate::commands::{file_progress, load_genome, print_boxed_label, run_with_spinner};

/// Runs the extraction pipeline over a structure directory.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Transcript table (gene, transcript, chromosome, protein), plain or gzip.
    #[arg(short, long, value_name = "FILE")]
    pub genome: PathBuf,
    /// TOML configuration file. Flags below override its values.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Structure-to-transcript identifier map.
    #[arg(long, value_name = "FILE")]
    pub id_map: Option<PathBuf>,
    /// Root directory searched recursively for structure files.
    #[arg(long, value_name = "DIR")]
    pub pdb_dir: Option<PathBuf>,
    /// Directory receiving interactions.bin.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
    /// Explicit interactions file path, overriding --data-dir.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Also write every confirmed mapping to this file.
    #[arg(long, value_name = "FILE")]
    pub confirmed_map: Option<PathBuf>,
    /// Minimum sequence distance between paired residues.
    #[arg(long, value_name = "INT")]
    pub min_separation: Option<usize>,
    /// Largest atom distance (Å) reported as a contact.
    #[arg(long, value_name = "FLOAT")]
    pub contact_threshold: Option<f64>,
    /// Smallest atom distance (Å) reported as a non-contact.
    #[arg(long, value_name = "FLOAT")]
    pub non_contact_threshold: Option<f64>,
    /// Coarsest accepted resolution (Å).
    #[arg(long, value_name = "FLOAT")]
    pub max_resolution: Option<f64>,
    /// Organism common name chains must carry.
    #[arg(long, value_name = "NAME")]
    pub organism: Option<String>,
    /// Organism scientific name accepted as an alternative.
    #[arg(long, value_name = "NAME")]
    pub organism_scientific: Option<String>,
    /// Exclusive upper bound on the chain/protein mismatch rate.
    #[arg(long, value_name = "FLOAT")]
    pub max_mismatch_rate: Option<f64>,
    /// Skip contact detection on chains with more amino acids.
    #[arg(long, value_name = "INT")]
    pub max_chain_residues: Option<usize>,
    /// Worker threads (0 uses every core).
    #[arg(short = 'j', long, value_name = "INT")]
    pub threads: Option<usize>,
}

/// Loads inputs, runs the pipeline and prints the run summary.
pub fn run(args: &ExtractArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.validate().context("Invalid extraction parameters")?;

    let genome = load_genome(&args.genome)?;
    let id_map = run_with_spinner("Loading identifier map", || {
        IdMap::load(&config.id_map).with_context(|| {
            format!("Failed to load identifier map {}", config.id_map.display())
        })
    })?;
    let files = discover(&config.pdb_dir).context("Failed to list structure files")?;

    let output = config.output_path();
    let sink = open_sink(&output)?;
    let mut pipeline = Pipeline::new(&genome, &id_map, &config, sink)?;
    if let Some(path) = &config.confirmed_map {
        let file = File::create(path)
            .with_context(|| format!("Failed to create confirmed map {}", path.display()))?;
        pipeline = pipeline.with_confirmed_map(Box::new(BufWriter::new(file)));
    }

    let progress = file_progress(files.len());
    pipeline.run_with(&files, |path, outcome| {
        if let FileOutcome::Processed { .. } = outcome {
            progress.set_message(structure_id_from_path(path));
        }
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    let summary = pipeline
        .finalize()
        .with_context(|| format!("Failed to complete {}", output.display()))?;
    info!("Interactions written to '{}'", output.display());
    print_summary(&summary, &output)
}

fn resolve_config(args: &ExtractArgs) -> Result<ExtractConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };

    if let Some(value) = &args.id_map {
        config.id_map = value.clone();
    }
    if let Some(value) = &args.pdb_dir {
        config.pdb_dir = value.clone();
    }
    if let Some(value) = &args.data_dir {
        config.data_dir = value.clone();
    }
    if args.output.is_some() {
        config.output = args.output.clone();
    }
    if args.confirmed_map.is_some() {
        config.confirmed_map = args.confirmed_map.clone();
    }
    if let Some(value) = args.min_separation {
        config.min_separation = value;
    }
    if let Some(value) = args.contact_threshold {
        config.contact_threshold = value;
    }
    if args.non_contact_threshold.is_some() {
        config.non_contact_threshold = args.non_contact_threshold;
    }
    if let Some(value) = args.max_resolution {
        config.max_resolution = value;
    }
    if let Some(value) = &args.organism {
        config.organism = value.clone();
    }
    if args.organism_scientific.is_some() {
        config.organism_scientific = args.organism_scientific.clone();
    }
    if let Some(value) = args.max_mismatch_rate {
        config.max_mismatch_rate = value;
    }
    if args.max_chain_residues.is_some() {
        config.max_chain_residues = args.max_chain_residues;
    }
    if let Some(value) = args.threads {
        config.threads = value;
    }

    Ok(config)
}

fn print_summary(summary: &RunSummary, output: &Path) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Extraction Summary")?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Metric", "Value"]);
    table.add_row(row!["Structure files", summary.files_discovered]);
    table.add_row(row!["Without candidates", summary.no_candidates]);
    table.add_row(row!["Unreadable", summary.parse_errors]);
    table.add_row(row!["Rejected (resolution)", summary.rejected_resolution]);
    table.add_row(row!["Rejected (organism)", summary.rejected_organism]);
    table.add_row(row!["Passing filters", summary.files_passing]);
    table.add_row(row!["Unconfirmed", summary.unconfirmed]);
    table.add_row(row!["Confirmed mappings", summary.confirmed_mappings]);
    table.add_row(row!["Chains too long", summary.chains_too_long]);
    table.add_row(row!["Contacts", summary.contact_records]);
    table.add_row(row!["Non-contacts", summary.non_contact_records]);
    table.add_row(row!["Duplicate records", summary.duplicate_records]);
    table.add_row(row!["Unresolved residues", summary.coordinate_errors]);
    if summary.files_cancelled > 0 {
        table.add_row(row!["Cancelled", summary.files_cancelled]);
    }
    table.add_row(row!["Records written", summary.records_written()]);
    table.add_row(row!["Output", output.display()]);
    table
        .print(&mut stderr)
        .context("Failed to render extraction summary")?;
    stderr.flush()?;

    Ok(())
}
