use super::atom::Atom;
use super::types::{AminoAcid, ResidueKind};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Sequence number as given by the source file. Values <= 0 occur in real entries.
    pub seq_num: i32,
    pub insertion_code: Option<char>,
    pub name: String,
    pub kind: ResidueKind,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(seq_num: i32, insertion_code: Option<char>, name: &str, kind: ResidueKind) -> Self {
        Self {
            seq_num,
            insertion_code,
            name: name.to_string(),
            kind,
            atoms: Vec::new(),
        }
    }

    pub fn amino_acid(&self) -> Option<AminoAcid> {
        self.kind.amino_acid()
    }

    pub fn is_amino_acid(&self) -> bool {
        self.amino_acid().is_some()
    }

    /// One-letter code for amino-acid residues.
    pub fn one_letter_code(&self) -> Option<char> {
        self.amino_acid().map(|aa| aa.one_letter_code())
    }

    /// Zero-based index into the protein sequence, `None` for non-positive sequence numbers.
    pub fn protein_index(&self) -> Option<usize> {
        usize::try_from(self.seq_num - 1).ok()
    }

    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    /// Smallest distance between any atom of `self` and any atom of `other`.
    ///
    /// Returns `f64::INFINITY` when either residue has no atoms.
    pub fn min_distance(&self, other: &Residue) -> f64 {
        let mut best = f64::INFINITY;
        for a in &self.atoms {
            for b in &other.atoms {
                best = best.min(a.distance_squared(b));
            }
        }
        best.sqrt()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Residue {{ seq: {}{}, name: \"{}\", kind: {}, atoms: {} }}",
            self.seq_num,
            self.insertion_code.map(String::from).unwrap_or_default(),
            self.name,
            self.kind,
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;

    fn residue_with_atoms(seq: i32, coords: &[(f64, f64, f64)]) -> Residue {
        let mut residue = Residue::new(seq, None, "GLY", ResidueKind::AminoAcid(AminoAcid::GLY));
        for (i, (x, y, z)) in coords.iter().enumerate() {
            residue.add_atom(Atom::new(&format!("A{i}"), Point::new(*x, *y, *z)));
        }
        residue
    }

    #[test]
    fn protein_index_is_zero_based_and_skips_non_positive_numbers() {
        assert_eq!(residue_with_atoms(1, &[]).protein_index(), Some(0));
        assert_eq!(residue_with_atoms(25, &[]).protein_index(), Some(24));
        assert_eq!(residue_with_atoms(0, &[]).protein_index(), None);
        assert_eq!(residue_with_atoms(-3, &[]).protein_index(), None);
    }

    #[test]
    fn one_letter_code_is_none_for_non_amino_acids() {
        let water = Residue::new(1, None, "HOH", ResidueKind::Water);
        let gly = residue_with_atoms(1, &[]);

        assert_eq!(water.one_letter_code(), None);
        assert!(!water.is_amino_acid());
        assert_eq!(gly.one_letter_code(), Some('G'));
    }

    #[test]
    fn min_distance_takes_closest_atom_pair() {
        let a = residue_with_atoms(1, &[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]);
        let b = residue_with_atoms(2, &[(12.5, 0.0, 0.0), (30.0, 0.0, 0.0)]);

        assert!((a.min_distance(&b) - 2.5).abs() < 1e-12);
        assert!((b.min_distance(&a) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn min_distance_is_infinite_without_atoms() {
        let a = residue_with_atoms(1, &[(0.0, 0.0, 0.0)]);
        let empty = residue_with_atoms(2, &[]);

        assert!(a.min_distance(&empty).is_infinite());
    }

    #[test]
    fn atom_lookup_finds_by_name() {
        let residue = residue_with_atoms(7, &[(1.0, 1.0, 1.0)]);

        assert!(residue.atom("A0").is_some());
        assert!(residue.atom("CA").is_none());
        assert_eq!(residue.atom_count(), 1);
        assert!(!residue.is_empty());
    }
}
