//! Durable storage of residue-pair proximity records.
//!
//! Records are written as gzip-compressed, tab-separated UTF-8 lines (see [`record`]) and
//! read back by [`reader`] without any structure data.

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::{open, read};
pub use writer::{InteractionWriter, RecordSink};
