//! Intra-chain residue proximity detection.
//!
//! Residues are the chain's amino acids in file order. A pair `(i, j)` is examined only
//! when `j >= i + min_separation`, and its distance is the smallest distance between any
//! atom of one residue and any atom of the other. Selected pairs are located on the
//! transcript protein and emitted as [`DistanceRecord`]s.

use crate::config::ExtractConfig;
use crate::db::genome::Transcript;
use crate::model::chain::Chain;
use crate::model::grid::Grid;
use crate::model::record::{ContactKind, DistanceRecord, ResidueSite, interaction_id};
use crate::model::residue::Residue;
use crate::model::types::Point;
use std::collections::BTreeMap;
use tracing::debug;

/// Smallest grid cell used for neighbor queries, in ångströms.
const MIN_GRID_CELL: f64 = 4.0;

/// Grid cells allowed per indexed atom before the scan falls back to measuring every pair.
const MAX_CELLS_PER_ATOM: usize = 8;

/// Cell budget granted to any chain regardless of its atom count.
const MIN_CELL_BUDGET: usize = 1024;

/// Relative widening of grid query radii; pairs are still classified on exact distances.
const GRID_RADIUS_SLACK: f64 = 1e-9;

/// Distance thresholds and separation for contact detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactConfig {
    /// Minimum index distance between the residues of a pair.
    pub min_separation: usize,
    /// Pairs with `distance <= contact_threshold` are contacts.
    pub contact_threshold: f64,
    /// Pairs with `distance > non_contact_threshold` are non-contacts; `None` disables them.
    pub non_contact_threshold: Option<f64>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self::from(&ExtractConfig::default())
    }
}

impl From<&ExtractConfig> for ContactConfig {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            min_separation: config.min_separation,
            contact_threshold: config.contact_threshold,
            non_contact_threshold: config.non_contact_threshold,
        }
    }
}

impl ContactConfig {
    /// Classifies a minimal distance; `None` when the pair is neither kind.
    pub fn classify(&self, distance: f64) -> Option<ContactKind> {
        if distance <= self.contact_threshold {
            Some(ContactKind::Contact)
        } else if self
            .non_contact_threshold
            .is_some_and(|threshold| distance > threshold)
        {
            Some(ContactKind::NonContact)
        } else {
            None
        }
    }
}

/// Records found in one chain, plus the selected pairs that could not be placed on the
/// transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainContacts {
    pub records: Vec<DistanceRecord>,
    pub coordinate_errors: usize,
}

impl ChainContacts {
    pub fn count(&self, kind: ContactKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }
}

/// Detects residue pairs of `chain` and places them on `transcript`.
///
/// With non-contact detection disabled, candidate pairs come from a spatial grid over the
/// chain's atoms; otherwise every pair is measured. Both paths produce the same records in
/// the same order: by first residue, then by second residue.
///
/// A selected pair is skipped and counted in
/// [`coordinate_errors`](ChainContacts::coordinate_errors) when either residue has a
/// sequence number below 1, lies past the end of the protein, disagrees with the protein
/// letter, or has no atoms.
///
/// # Arguments
///
/// * `structure_id` - Identifier embedded in interaction ids.
/// * `chain` - Confirmed chain.
/// * `transcript` - Transcript the chain was confirmed against.
/// * `config` - Thresholds and separation.
pub fn detect_contacts(
    structure_id: &str,
    chain: &Chain,
    transcript: &Transcript,
    config: &ContactConfig,
) -> ChainContacts {
    let residues: Vec<&Residue> = chain.amino_acids().collect();
    let sites: Vec<Option<ResidueSite>> = residues
        .iter()
        .map(|residue| locate(residue, transcript))
        .collect();

    let pairs = match config.non_contact_threshold {
        None => grid_pairs(&residues, config),
        Some(_) => exhaustive_pairs(&residues, config),
    };

    let mut result = ChainContacts::default();
    for (i, j, distance, kind) in pairs {
        let (Some(site1), Some(site2)) = (&sites[i], &sites[j]) else {
            result.coordinate_errors += 1;
            continue;
        };
        result.records.push(DistanceRecord {
            interaction_id: interaction_id(
                structure_id,
                &chain.id,
                residues[i].seq_num,
                &chain.id,
                residues[j].seq_num,
                &transcript.id,
                &transcript.id,
            ),
            kind,
            distance,
            site1: site1.clone(),
            site2: site2.clone(),
        });
    }

    result
}

/// Places a residue on the transcript protein, or `None` when it cannot be placed.
fn locate(residue: &Residue, transcript: &Transcript) -> Option<ResidueSite> {
    if residue.is_empty() {
        return None;
    }
    let index = residue.protein_index()?;
    let code = residue.one_letter_code()?;
    let expected = transcript.amino_acid_at(index)?;
    if !expected.eq_ignore_ascii_case(&code) {
        return None;
    }

    Some(ResidueSite {
        chromosome: transcript.chromosome.clone(),
        transcript_id: transcript.id.clone(),
        position: index + 1,
        amino_acid: expected,
    })
}

type Pair = (usize, usize, f64, ContactKind);

fn exhaustive_pairs(residues: &[&Residue], config: &ContactConfig) -> Vec<Pair> {
    let n = residues.len();
    let mut pairs = Vec::new();

    for i in 0..n {
        for j in (i + config.min_separation)..n {
            let distance = residues[i].min_distance(residues[j]);
            if let Some(kind) = config.classify(distance) {
                pairs.push((i, j, distance, kind));
            }
        }
    }

    pairs
}

fn grid_pairs(residues: &[&Residue], config: &ContactConfig) -> Vec<Pair> {
    let atoms: Vec<(Point, usize)> = residues
        .iter()
        .enumerate()
        .flat_map(|(idx, residue)| residue.iter_atoms().map(move |atom| (atom.pos, idx)))
        .collect();
    let cell_size = config.contact_threshold.max(MIN_GRID_CELL);
    let budget = atoms
        .len()
        .saturating_mul(MAX_CELLS_PER_ATOM)
        .max(MIN_CELL_BUDGET);
    match Grid::<usize>::cell_count(atoms.iter().map(|(pos, _)| pos), cell_size) {
        Some(cells) if cells <= budget => {}
        cells => {
            debug!(
                "Sparse or unbounded atom spread ({:?} cells for {} atoms), measuring every pair",
                cells,
                atoms.len()
            );
            return exhaustive_pairs(residues, config);
        }
    }

    let grid = Grid::new(atoms, cell_size);
    let radius = config.contact_threshold * (1.0 + GRID_RADIUS_SLACK);
    let mut pairs = Vec::new();

    for (i, residue) in residues.iter().enumerate() {
        let mut nearest: BTreeMap<usize, f64> = BTreeMap::new();
        for atom in residue.iter_atoms() {
            for (pos, &j) in grid.within(&atom.pos, radius) {
                if j < i + config.min_separation {
                    continue;
                }
                let d2 = nalgebra::distance_squared(&atom.pos, pos);
                nearest
                    .entry(j)
                    .and_modify(|best| *best = best.min(d2))
                    .or_insert(d2);
            }
        }

        for (j, d2) in nearest {
            let distance = d2.sqrt();
            if let Some(kind) = config.classify(distance) {
                pairs.push((i, j, distance, kind));
            }
        }
    }

    pairs
}
