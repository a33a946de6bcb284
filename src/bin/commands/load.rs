use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use pdb_contacts::ContactKind;
use pdb_contacts::io::interactions;
use pdb_contacts::ops::attach_interactions;

use crate::commands::{load_genome, print_boxed_label, run_with_spinner};

/// Attaches an interactions file to the genes of a transcript table.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Transcript table (gene, transcript, chromosome, protein), plain or gzip.
    #[arg(short, long, value_name = "FILE")]
    pub genome: PathBuf,
    /// Interactions file produced by `extract`.
    #[arg(value_name = "FILE", default_value = "interactions.bin")]
    pub interactions: PathBuf,
}

/// Reads the records, attaches them and prints what resolved.
pub fn run(args: &LoadArgs) -> Result<()> {
    let mut genome = load_genome(&args.genome)?;
    let records = run_with_spinner("Reading interactions", || {
        interactions::open(&args.interactions).with_context(|| {
            format!("Failed to read interactions {}", args.interactions.display())
        })
    })?;

    let summary = attach_interactions(&mut genome, &records);
    let genes_with_loci = genome
        .iter_genes()
        .filter(|(handle, _)| !genome.loci(*handle).is_empty())
        .count();
    let contacts = records
        .iter()
        .filter(|r| r.kind == ContactKind::Contact)
        .count();

    let mut stderr = io::stderr().lock();
    print_boxed_label(&mut stderr, "Interaction Load Summary")?;
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Metric", "Value"]);
    table.add_row(row!["Records", records.len()]);
    table.add_row(row!["Contacts", contacts]);
    table.add_row(row!["Non-contacts", records.len() - contacts]);
    table.add_row(row!["Attached", summary.attached]);
    table.add_row(row!["Unknown chromosome", summary.missing_chromosome]);
    table.add_row(row!["Unknown transcript", summary.missing_transcript]);
    table.add_row(row!["Genes with interactions", genes_with_loci]);
    table
        .print(&mut stderr)
        .context("Failed to render load summary")?;

    Ok(())
}
