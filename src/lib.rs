//! # pdb-contacts
//!
//! **pdb-contacts** mines experimentally solved protein structures for residue pairs that are close in space but far apart in sequence, and reports them in genome coordinates. Each structure is tied to its transcripts through an identifier map, confirmed by comparing the chain's residues against the transcript's protein, and scanned for atom-level contacts.
//!
//! ## Features
//!
//! - **Structure model** – Lightweight `Atom`, `Residue`, `Chain`, and `Structure` types backed by `nalgebra`, with residue kinds that keep amino acids, nucleotides, waters and hetero groups apart.
//! - **Streaming I/O** – Buffered, gzip-transparent readers for PDB files, identifier maps, transcript tables and interaction records, with line-accurate diagnostics.
//! - **Sequence confirmation** – Chains are aligned to proteins by residue number and accepted below a configurable mismatch rate.
//! - **Grid-accelerated contacts** – A uniform spatial grid limits atom-pair scans to neighboring cells while yielding exactly the pairs an exhaustive scan would.
//! - **Parallel pipeline** – Structure files are processed on a bounded `rayon` pool and written to a shared gzip sink whose lines never interleave.

mod db;
mod model;

pub mod config;
pub mod io;
pub mod ops;

pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::grid::Grid;
pub use model::record::{ContactKind, DistanceRecord, ResidueSite};
pub use model::residue::Residue;
pub use model::structure::Structure;
pub use model::types::{AminoAcid, Point, ResidueKind};

pub use db::genome::{Gene, GeneId, Genome, InteractionLocus, Transcript, TranscriptId};
pub use db::id_map::{IdMap, IdMapEntry, transcript_ids};
pub use db::transcripts::{TranscriptIndex, strip_version};

pub use config::ExtractConfig;
