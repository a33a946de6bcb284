use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use pdb_contacts::io::compression::open_reader;
use pdb_contacts::io::{IoContext, read_pdb_structure};
use pdb_contacts::ops::{FilterConfig, accept_chain, accept_structure, structure_id_from_path};
use pdb_contacts::{IdMap, Structure, transcript_ids};

use crate::commands::{print_boxed_label, run_with_spinner};

/// Report-only command that parses one structure file.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Structure file (PDB format, plain or gzip).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Identifier map used to list the structure's candidate transcripts.
    #[arg(long, value_name = "FILE")]
    pub id_map: Option<PathBuf>,
    /// Organism common name evaluated by the filter column.
    #[arg(long, value_name = "NAME", default_value = "HUMAN")]
    pub organism: String,
    /// Coarsest resolution (Å) evaluated by the filter verdict.
    #[arg(long, value_name = "FLOAT", default_value_t = 3.0)]
    pub max_resolution: f64,
}

/// Parses the structure and prints header metadata, chains and the filter verdict.
pub fn run(args: &InspectArgs) -> Result<()> {
    let structure = run_with_spinner("Parsing structure", || {
        let reader = open_reader(&args.file)
            .with_context(|| format!("Failed to open {}", args.file.display()))?;
        read_pdb_structure(reader, &IoContext::new_default())
            .with_context(|| format!("Failed to parse {}", args.file.display()))
    })?;

    let candidates = match &args.id_map {
        Some(path) => {
            let id_map = IdMap::load(path)
                .with_context(|| format!("Failed to load identifier map {}", path.display()))?;
            let id = structure_id_from_path(&args.file);
            Some(transcript_ids(id_map.lookup(&id)).into_iter().collect::<Vec<_>>())
        }
        None => None,
    };

    let filter = FilterConfig {
        max_resolution: args.max_resolution,
        organism: args.organism.trim().to_ascii_uppercase(),
        organism_scientific: None,
    };
    print_report(&structure, &filter, candidates.as_deref())
}

fn print_report(
    structure: &Structure,
    filter: &FilterConfig,
    candidates: Option<&[String]>,
) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Chain Breakdown")?;
    let mut chain_table = Table::new();
    chain_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    chain_table.set_titles(row![
        "Chain",
        "Organism",
        "Scientific Name",
        "Amino Acids",
        "Residues",
        "Atoms",
        "Organism Match"
    ]);
    for chain in structure.iter_chains() {
        chain_table.add_row(row![
            chain.id,
            chain.organism_common.as_deref().unwrap_or("-"),
            chain.organism_scientific.as_deref().unwrap_or("-"),
            chain.amino_acid_count(),
            chain.residue_count(),
            chain.iter_atoms().count(),
            if accept_chain(chain, filter) { "yes" } else { "no" }
        ]);
    }
    chain_table
        .print(&mut stderr)
        .context("Failed to render chain summary")?;
    writeln!(&mut stderr)?;

    print_boxed_label(&mut stderr, "Structure Summary")?;
    let mut summary_table = Table::new();
    summary_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary_table.set_titles(row!["Metric", "Value"]);
    summary_table.add_row(row![
        "ID Code",
        structure.id_code.as_deref().unwrap_or("-")
    ]);
    summary_table.add_row(row![
        "Resolution (Å)",
        structure
            .resolution
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| "Not reported".to_string())
    ]);
    summary_table.add_row(row!["Chains", structure.chain_count()]);
    summary_table.add_row(row!["Atoms", structure.atom_count()]);
    let verdict = match accept_structure(structure, filter) {
        Ok(()) => "accepted".to_string(),
        Err(rejection) => format!("rejected: {rejection}"),
    };
    summary_table.add_row(row!["Filter", verdict]);
    if let Some(candidates) = candidates {
        let listed = if candidates.is_empty() {
            "none".to_string()
        } else {
            candidates.join(", ")
        };
        summary_table.add_row(row!["Candidate Transcripts", listed]);
    }
    summary_table
        .print(&mut stderr)
        .context("Failed to render structure summary")?;

    Ok(())
}
