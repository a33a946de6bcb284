//! Operations that turn structure files into interaction records.
//!
//! Filtering, sequence confirmation and contact detection are independent building
//! blocks; [`Pipeline`] composes them over a directory of structure files and
//! [`attach_interactions`] feeds the records back onto a genome. All of them share a
//! common error type.

mod annotate;
mod confirm;
mod contacts;
mod error;
mod filter;
mod pipeline;

pub use annotate::{AttachSummary, attach_interactions};

pub use filter::{FilterConfig, Rejection, accept_chain, accept_structure};

pub use confirm::{Confirmation, SequenceMatch, compare_chain, confirm};

pub use contacts::{ChainContacts, ContactConfig, detect_contacts};

pub use pipeline::{
    FileOutcome, Pipeline, RunSummary, StopHandle, discover, open_sink, structure_id_from_path,
};

pub use error::Error;
