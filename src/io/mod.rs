//! IO front-end for structure files, identifier tables and interaction records.
//!
//! Structure readers share an [`IoContext`] that classifies residue names, and every file
//! reader accepts plain or gzip-compressed input through [`compression::open_reader`].

pub mod compression;
mod context;
mod error;
pub mod interactions;
mod pdb;
pub mod transcripts;

pub use pdb::reader::read as read_pdb_structure;

pub use interactions::{InteractionWriter, RecordSink};

pub use context::IoContext;

pub use error::Error;
