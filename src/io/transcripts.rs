//! Tab-separated transcript table used as the genome view.
//!
//! ```text
//! # gene_id  transcript_id  chromosome  protein
//! ENSG00000146648  ENST00000275493.7  7  MRPSGTAGAALLALLAALCPASRA...
//! ```

use crate::db::genome::Genome;
use crate::io::compression::open_reader;
use crate::io::error::Error;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

const FORMAT: &str = "transcript table";

/// Builds a [`Genome`] from a transcript table.
///
/// `#` lines and blank lines are ignored. A trailing `*` on a protein is dropped.
///
/// # Errors
///
/// Returns [`Error::Parse`] for lines that are not UTF-8, lack exactly four fields or
/// carry empty ids.
pub fn read<R: BufRead>(mut reader: R) -> Result<Genome, Error> {
    let mut genome = Genome::new();

    let mut buf = Vec::new();
    let mut line_num = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::from_io(e, None))?;
        if read == 0 {
            break;
        }
        line_num += 1;

        let line = std::str::from_utf8(&buf)
            .map_err(|_| Error::parse(FORMAT, None, line_num, "Line is not valid UTF-8"))?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let [gene_id, transcript_id, chromosome, protein] = fields[..] else {
            return Err(Error::parse(
                FORMAT,
                None,
                line_num,
                format!("Expected 4 fields, found {}", fields.len()),
            ));
        };
        if gene_id.is_empty() || transcript_id.is_empty() || chromosome.is_empty() {
            return Err(Error::parse(FORMAT, None, line_num, "Empty identifier"));
        }

        let gene = genome.add_gene(gene_id);
        genome.add_transcript(gene, transcript_id, chromosome, protein);
    }

    Ok(genome)
}

/// Reads a plain or gzip-compressed transcript table.
pub fn open(path: &Path) -> Result<Genome, Error> {
    info!("Loading transcripts from '{}'", path.display());
    let reader = open_reader(path)?;
    let genome = read(reader).map_err(|e| e.with_path(path))?;
    info!(
        "Loaded {} transcripts in {} genes",
        genome.transcript_count(),
        genome.gene_count()
    );
    Ok(genome)
}
