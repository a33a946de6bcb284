//! Attaches extracted interactions back onto a genome.
//!
//! Every record becomes two [`InteractionLocus`] markers, one per side, stored on the
//! gene that owns the side's transcript. Both markers carry the shared interaction id
//! and point at each other's transcript.

use crate::db::genome::{Genome, InteractionLocus, TranscriptId};
use crate::model::record::{DistanceRecord, ResidueSite};
use tracing::{debug, info};

/// Outcome of [`attach_interactions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachSummary {
    /// Records whose two sides were attached.
    pub attached: usize,
    /// Records naming a chromosome absent from the genome.
    pub missing_chromosome: usize,
    /// Records naming a transcript id absent from the record's chromosome.
    pub missing_transcript: usize,
}

impl AttachSummary {
    pub fn skipped(&self) -> usize {
        self.missing_chromosome + self.missing_transcript
    }
}

enum Unresolved {
    Chromosome,
    Transcript,
}

fn resolve(genome: &Genome, site: &ResidueSite) -> Result<TranscriptId, Unresolved> {
    if !genome.has_chromosome(&site.chromosome) {
        return Err(Unresolved::Chromosome);
    }
    genome
        .transcript_on(&site.chromosome, &site.transcript_id)
        .ok_or(Unresolved::Transcript)
}

/// Attaches interaction records to the genes of `genome`.
///
/// Chromosomes are resolved against the genome's chromosome set. Transcripts are
/// resolved by exact, version-including id on the record's chromosome, so a copy of the
/// transcript on another chromosome never receives the marker. A record with an
/// unresolved side is skipped entirely.
///
/// # Arguments
///
/// * `genome` - Genome receiving the markers.
/// * `records` - Records as read back from an interactions file.
///
/// # Returns
///
/// Counts of attached and skipped records.
pub fn attach_interactions(genome: &mut Genome, records: &[DistanceRecord]) -> AttachSummary {
    let mut summary = AttachSummary::default();

    for record in records {
        let sides = resolve(genome, &record.site1)
            .and_then(|first| resolve(genome, &record.site2).map(|second| (first, second)));
        let (first, second) = match sides {
            Ok(pair) => pair,
            Err(Unresolved::Chromosome) => {
                debug!("{}: unknown chromosome, skipped", record.interaction_id);
                summary.missing_chromosome += 1;
                continue;
            }
            Err(Unresolved::Transcript) => {
                debug!("{}: unknown transcript, skipped", record.interaction_id);
                summary.missing_transcript += 1;
                continue;
            }
        };

        for (own, site, partner) in [
            (first, &record.site1, second),
            (second, &record.site2, first),
        ] {
            let gene = genome.transcript(own).gene();
            genome.add_locus(
                gene,
                InteractionLocus {
                    transcript: own,
                    position: site.position,
                    partner,
                    interaction_id: record.interaction_id.clone(),
                    kind: record.kind,
                },
            );
        }
        summary.attached += 1;
    }

    info!(
        "Attached {} interactions ({} skipped)",
        summary.attached,
        summary.skipped()
    );
    summary
}
