//! Identifier map associating structure ids with transcript ids.
//!
//! The map is a curated table, one mapping per line:
//!
//! ```text
//! # structure_id  transcript_id  [chain_id]
//! 1A12            NM_001269.4
//! 1A12            ENST00000373625   A
//! ```
//!
//! Fields are tab- or whitespace-separated; `#` lines and blank lines are ignored. Lines
//! with fewer than two fields are skipped and counted. Structure ids are upper-cased and
//! transcript ids are stored without their version suffix.

use super::transcripts::strip_version;
use crate::io::compression::open_reader;
use crate::io::Error;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// Candidate or confirmed association between a structure and a transcript.
///
/// Entries are immutable values: confirmation produces a new entry through
/// [`IdMapEntry::confirmed`] instead of filling fields in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdMapEntry {
    pub structure_id: String,
    pub transcript_id: String,
    pub chain_id: Option<String>,
    pub structure_chain_length: Option<usize>,
    pub transcript_length: Option<usize>,
}

impl IdMapEntry {
    pub fn new(structure_id: &str, transcript_id: &str) -> Self {
        Self {
            structure_id: structure_id.to_ascii_uppercase(),
            transcript_id: strip_version(transcript_id).to_string(),
            chain_id: None,
            structure_chain_length: None,
            transcript_length: None,
        }
    }

    pub fn with_chain(self, chain_id: &str) -> Self {
        Self {
            chain_id: Some(chain_id.to_string()),
            ..self
        }
    }

    /// Derives the confirmed form of this candidate for one structure chain.
    pub fn confirmed(&self, chain_id: &str, chain_length: usize, transcript_length: usize) -> Self {
        Self {
            chain_id: Some(chain_id.to_string()),
            structure_chain_length: Some(chain_length),
            transcript_length: Some(transcript_length),
            ..self.clone()
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.chain_id.is_some()
            && self.structure_chain_length.is_some()
            && self.transcript_length.is_some()
    }
}

impl fmt::Display for IdMapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_default();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.structure_id,
            self.transcript_id,
            self.chain_id.as_deref().unwrap_or(""),
            opt(self.structure_chain_length),
            opt(self.transcript_length)
        )
    }
}

/// Structure id -> candidate entries.
#[derive(Debug, Clone, Default)]
pub struct IdMap {
    by_structure: HashMap<String, Vec<IdMapEntry>>,
    skipped_lines: usize,
}

impl IdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a map from a plain or gzip-compressed file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be opened or read. Malformed lines are
    /// skipped, not reported as errors.
    pub fn load(path: &Path) -> Result<Self, Error> {
        info!("Loading ID map from '{}'", path.display());
        let reader = open_reader(path)?;
        let map = Self::from_reader(reader).map_err(|e| e.with_path(path))?;
        info!(
            "Loaded {} mappings for {} structures ({} lines skipped)",
            map.entry_count(),
            map.structure_count(),
            map.skipped_lines
        );
        Ok(map)
    }

    /// Parses a map from any buffered source.
    ///
    /// Lines that are not valid UTF-8 are skipped and counted like malformed ones.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut map = Self::new();
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

            let Ok(line) = std::str::from_utf8(&buf) else {
                debug!("Skipping ID map line {}: not valid UTF-8", line_num);
                map.skipped_lines += 1;
                continue;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            if fields.len() < 2 {
                debug!("Skipping ID map line {}: '{}'", line_num, trimmed);
                map.skipped_lines += 1;
                continue;
            }

            let mut entry = IdMapEntry::new(fields[0], fields[1]);
            if let Some(chain) = fields.get(2) {
                entry = entry.with_chain(chain);
            }
            map.insert(entry);
        }

        Ok(map)
    }

    /// Adds an entry unless an identical one is already present.
    pub fn insert(&mut self, entry: IdMapEntry) {
        let entries = self.by_structure.entry(entry.structure_id.clone()).or_default();
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }

    /// Candidate entries for a structure id; empty when the id is unknown.
    pub fn lookup(&self, structure_id: &str) -> &[IdMapEntry] {
        self.by_structure
            .get(&structure_id.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn structure_count(&self) -> usize {
        self.by_structure.len()
    }

    pub fn entry_count(&self) -> usize {
        self.by_structure.values().map(Vec::len).sum()
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

/// Distinct transcript ids referenced by `entries`.
pub fn transcript_ids(entries: &[IdMapEntry]) -> BTreeSet<String> {
    entries.iter().map(|e| e.transcript_id.clone()).collect()
}
