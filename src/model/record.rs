//! Residue-pair proximity records produced by contact detection.
//!
//! A [`DistanceRecord`] is keyed by transcript coordinates rather than structure
//! coordinates, so it stays meaningful after the structure that produced it is gone.

use std::fmt;
use std::str::FromStr;

/// Classification of a residue pair by its minimal inter-atomic distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactKind {
    /// Distance at or below the contact threshold.
    Contact,
    /// Distance strictly above the non-contact threshold.
    NonContact,
}

impl ContactKind {
    pub fn name(&self) -> &'static str {
        match self {
            ContactKind::Contact => "contact",
            ContactKind::NonContact => "non_contact",
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ContactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contact" => Ok(ContactKind::Contact),
            "non_contact" => Ok(ContactKind::NonContact),
            _ => Err(format!("Invalid contact kind: {}", s)),
        }
    }
}

/// One side of an interaction: a residue located on a transcript protein.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueSite {
    pub chromosome: String,
    pub transcript_id: String,
    /// One-based amino-acid position in the transcript protein.
    pub position: usize,
    /// One-letter amino-acid code observed at `position`.
    pub amino_acid: char,
}

/// Immutable proximity record between two residue sites.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRecord {
    /// Shared id re-associating both sides, e.g. `1A12:A_25-A_136:NM_001269.4`.
    pub interaction_id: String,
    pub kind: ContactKind,
    pub distance: f64,
    pub site1: ResidueSite,
    pub site2: ResidueSite,
}

impl DistanceRecord {
    pub fn is_self_contact(&self) -> bool {
        self.site1.transcript_id == self.site2.transcript_id
            && self.site1.chromosome == self.site2.chromosome
    }
}

/// Builds the interaction id shared by both sides of a residue pair.
///
/// Residue numbers are the structure's own sequence numbers. The second transcript id
/// is appended only when it differs from the first.
pub fn interaction_id(
    structure_id: &str,
    chain1: &str,
    seq1: i32,
    chain2: &str,
    seq2: i32,
    transcript1: &str,
    transcript2: &str,
) -> String {
    let mut id = format!("{structure_id}:{chain1}_{seq1}-{chain2}_{seq2}:{transcript1}");
    if transcript1 != transcript2 {
        id.push('-');
        id.push_str(transcript2);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interaction_id_omits_repeated_transcript() {
        assert_eq!(
            interaction_id("1A12", "A", 25, "A", 136, "NM_001269.4", "NM_001269.4"),
            "1A12:A_25-A_136:NM_001269.4"
        );
    }

    #[test]
    fn interaction_id_lists_both_transcripts_when_different() {
        assert_eq!(
            interaction_id("4OVU", "A", 7, "B", 479, "NM_006218.2", "NM_181523.2"),
            "4OVU:A_7-B_479:NM_006218.2-NM_181523.2"
        );
    }

    #[test]
    fn contact_kind_parses_its_display_form() {
        for kind in [ContactKind::Contact, ContactKind::NonContact] {
            assert_eq!(kind.to_string().parse::<ContactKind>(), Ok(kind));
        }
        assert!("touching".parse::<ContactKind>().is_err());
    }
}
