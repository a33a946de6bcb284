//! Sequence confirmation of structure-to-transcript mappings.
//!
//! The identifier map only proposes candidates. A (transcript, chain) pair is confirmed
//! when the chain's amino acids, placed on the protein by their sequence numbers, agree
//! with the transcript's protein sequence often enough.

use super::filter::{FilterConfig, accept_chain};
use crate::db::genome::{Genome, Transcript, TranscriptId};
use crate::db::id_map::IdMapEntry;
use crate::db::transcripts::TranscriptIndex;
use crate::model::chain::Chain;
use crate::model::structure::Structure;
use std::collections::HashSet;
use tracing::debug;

/// Agreement counts between a chain and a protein sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceMatch {
    pub matches: usize,
    pub mismatches: usize,
}

impl SequenceMatch {
    pub fn compared(&self) -> usize {
        self.matches + self.mismatches
    }

    /// Fraction of compared residues that disagree; `None` when nothing was compared.
    pub fn mismatch_rate(&self) -> Option<f64> {
        match self.compared() {
            0 => None,
            n => Some(self.mismatches as f64 / n as f64),
        }
    }

    /// Confirmed when at least one residue was compared and the mismatch rate is
    /// strictly below `max_mismatch_rate`.
    pub fn is_confirmed(&self, max_mismatch_rate: f64) -> bool {
        self.mismatch_rate()
            .is_some_and(|rate| rate < max_mismatch_rate)
    }
}

/// A mapping that passed confirmation, with the handles needed for contact detection.
#[derive(Debug, Clone)]
pub struct Confirmation<'s> {
    pub entry: IdMapEntry,
    pub transcript: TranscriptId,
    pub chain: &'s Chain,
}

/// Compares a chain's amino-acid residues with a protein sequence.
///
/// Residue `seq` is compared with `protein[seq - 1]` ignoring case. Residues with a
/// sequence number below 1 are not compared; residues past the end of the protein count
/// as mismatches.
pub fn compare_chain(chain: &Chain, protein: &str) -> SequenceMatch {
    let protein = protein.as_bytes();
    let mut result = SequenceMatch::default();

    for residue in chain.amino_acids() {
        let (Some(index), Some(code)) = (residue.protein_index(), residue.one_letter_code())
        else {
            continue;
        };
        match protein.get(index) {
            Some(&expected) if (expected as char).eq_ignore_ascii_case(&code) => {
                result.matches += 1
            }
            _ => result.mismatches += 1,
        }
    }

    result
}

/// Confirms candidate mappings against a parsed structure.
///
/// Every candidate whose transcript resolves in `index` is tested against every chain that
/// passes the organism filter. A candidate that names a chain is only tested against that
/// chain. All passing pairs are confirmed; there is no best-match selection.
///
/// # Arguments
///
/// * `structure` - Structure already admitted by the structure filter.
/// * `candidates` - Identifier-map entries for the structure.
/// * `genome` - Transcript sequences.
/// * `index` - Version-insensitive transcript lookup.
/// * `filter` - Organism requirements for chains.
/// * `max_mismatch_rate` - Exclusive upper bound on the mismatch rate.
///
/// # Returns
///
/// Confirmations in candidate order, then chain order. Each carries the entry derived
/// with [`IdMapEntry::confirmed`].
pub fn confirm<'s>(
    structure: &'s Structure,
    candidates: &[IdMapEntry],
    genome: &Genome,
    index: &TranscriptIndex,
    filter: &FilterConfig,
    max_mismatch_rate: f64,
) -> Vec<Confirmation<'s>> {
    let mut seen: HashSet<(TranscriptId, &str)> = HashSet::new();
    let mut confirmed = Vec::new();

    for candidate in candidates {
        let Some(handle) = index.get(&candidate.transcript_id) else {
            continue;
        };
        let transcript: &Transcript = genome.transcript(handle);

        for chain in structure.iter_chains() {
            if candidate
                .chain_id
                .as_deref()
                .is_some_and(|wanted| wanted != chain.id)
            {
                continue;
            }
            if !accept_chain(chain, filter) || !seen.insert((handle, chain.id.as_str())) {
                continue;
            }

            let result = compare_chain(chain, transcript.protein());
            debug!(
                "{} chain {} vs {}: {} matches, {} mismatches",
                candidate.structure_id,
                chain.id,
                transcript.id,
                result.matches,
                result.mismatches
            );

            if result.is_confirmed(max_mismatch_rate) {
                confirmed.push(Confirmation {
                    entry: candidate.confirmed(
                        &chain.id,
                        chain.amino_acid_count(),
                        transcript.protein_len(),
                    ),
                    transcript: handle,
                    chain,
                });
            }
        }
    }

    confirmed
}
