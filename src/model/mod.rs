//! Structure model for experimentally solved macromolecules.
//!
//! A [`structure::Structure`] owns [`chain::Chain`]s, which own [`residue::Residue`]s,
//! which own [`atom::Atom`]s. Instances are built by the readers in `io`, inspected by
//! the filters and detectors in `ops`, and dropped as soon as one file is processed.

pub mod atom;
pub mod chain;
pub mod grid;
pub mod record;
pub mod residue;
pub mod structure;
pub mod types;
