//! Reference tables consulted while mining structures: the genome's genes and
//! transcripts, a version-insensitive transcript index, and the structure-to-transcript
//! identifier map.

pub mod genome;
pub mod id_map;
pub mod transcripts;
