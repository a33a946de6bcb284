//! Version-insensitive transcript lookup used to resolve identifier-map candidates.

use super::genome::{Genome, Transcript, TranscriptId};
use std::collections::HashMap;
use tracing::debug;

/// Strips a version suffix (`NM_001269.4` -> `NM_001269`).
///
/// A leading dot is not treated as a version separator.
pub fn strip_version(id: &str) -> &str {
    match id.find('.') {
        Some(dot) if dot > 0 => &id[..dot],
        _ => id,
    }
}

/// Read-only map from version-stripped transcript id to transcript handle.
#[derive(Debug, Clone, Default)]
pub struct TranscriptIndex {
    by_id: HashMap<String, TranscriptId>,
}

impl TranscriptIndex {
    /// Indexes every transcript of `genome`.
    ///
    /// When two transcripts share a stripped id, the one on the chromosome with the
    /// shorter name is kept (`chr6` over `chr6_cox_hap2`); on equal lengths the first
    /// one seen wins.
    pub fn build(genome: &Genome) -> Self {
        let mut by_id: HashMap<String, TranscriptId> = HashMap::new();

        for (handle, transcript) in genome.iter_transcripts() {
            let key = strip_version(&transcript.id);
            match by_id.get(key) {
                Some(&previous) => {
                    let prev_chr = &genome.transcript(previous).chromosome;
                    if transcript.chromosome.len() < prev_chr.len() {
                        debug!(
                            "Transcript '{}' on '{}' replaces copy on '{}'",
                            key, transcript.chromosome, prev_chr
                        );
                        by_id.insert(key.to_string(), handle);
                    }
                }
                None => {
                    by_id.insert(key.to_string(), handle);
                }
            }
        }

        Self { by_id }
    }

    /// Resolves a transcript id, with or without version suffix.
    pub fn get(&self, id: &str) -> Option<TranscriptId> {
        self.by_id.get(strip_version(id)).copied()
    }

    pub fn resolve<'g>(&self, genome: &'g Genome, id: &str) -> Option<&'g Transcript> {
        self.get(id).map(|h| genome.transcript(h))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_version_removes_suffix_only_after_first_character() {
        assert_eq!(strip_version("NM_001269.4"), "NM_001269");
        assert_eq!(strip_version("ENST00000367.12"), "ENST00000367");
        assert_eq!(strip_version("ENST00000367"), "ENST00000367");
        assert_eq!(strip_version(".hidden"), ".hidden");
    }

    #[test]
    fn get_accepts_versioned_and_unversioned_ids() {
        let mut genome = Genome::new();
        let gene = genome.add_gene("G");
        let tr = genome.add_transcript(gene, "NM_001269.4", "chr1", "MK");
        let index = TranscriptIndex::build(&genome);

        assert_eq!(index.get("NM_001269"), Some(tr));
        assert_eq!(index.get("NM_001269.3"), Some(tr));
        assert!(!index.contains("NM_999999"));
        assert_eq!(index.resolve(&genome, "NM_001269").unwrap().id, "NM_001269.4");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn duplicates_prefer_shorter_chromosome_names() {
        let mut genome = Genome::new();
        let gene = genome.add_gene("G");
        genome.add_transcript(gene, "NM_1.1", "chr6_cox_hap2", "M");
        let canonical = genome.add_transcript(gene, "NM_1.1", "chr6", "M");
        genome.add_transcript(gene, "NM_1.2", "chr6_apd_hap1", "M");
        let index = TranscriptIndex::build(&genome);

        assert_eq!(index.get("NM_1"), Some(canonical));
    }

    #[test]
    fn duplicates_with_equal_chromosome_length_keep_the_first() {
        let mut genome = Genome::new();
        let gene = genome.add_gene("G");
        let first = genome.add_transcript(gene, "T.1", "chr1", "M");
        genome.add_transcript(gene, "T.2", "chr2", "M");
        let index = TranscriptIndex::build(&genome);

        assert_eq!(index.get("T"), Some(first));
    }
}
