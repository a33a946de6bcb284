use super::residue::Residue;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    /// Organism common name from the source metadata, upper-cased (e.g. `HUMAN`).
    pub organism_common: Option<String>,
    /// Organism scientific name, upper-cased (e.g. `HOMO SAPIENS`).
    pub organism_scientific: Option<String>,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            organism_common: None,
            organism_scientific: None,
            residues: Vec::new(),
        }
    }

    pub fn has_organism(&self) -> bool {
        self.organism_common.is_some() || self.organism_scientific.is_some()
    }

    pub fn add_residue(&mut self, residue: Residue) {
        self.residues.push(residue);
    }

    pub fn residue(&self, seq_num: i32, insertion_code: Option<char>) -> Option<&Residue> {
        self.residues
            .iter()
            .find(|r| r.seq_num == seq_num && r.insertion_code == insertion_code)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter_residues(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    /// Amino-acid residues in file order; waters, ligands and nucleotides are skipped.
    pub fn amino_acids(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter().filter(|r| r.is_amino_acid())
    }

    pub fn amino_acid_count(&self) -> usize {
        self.amino_acids().count()
    }

    /// One-letter sequence of the amino-acid residues.
    pub fn sequence(&self) -> String {
        self.amino_acids()
            .filter_map(|r| r.one_letter_code())
            .collect()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &super::atom::Atom> {
        self.residues.iter().flat_map(|r| r.iter_atoms())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {{ id: \"{}\", organism: {}, residues: {} }}",
            self.id,
            self.organism_common.as_deref().unwrap_or("-"),
            self.residue_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{AminoAcid, Point, ResidueKind};

    fn amino(seq: i32, aa: AminoAcid) -> Residue {
        let mut residue = Residue::new(seq, None, &aa.to_string(), ResidueKind::AminoAcid(aa));
        residue.add_atom(Atom::new("CA", Point::new(seq as f64, 0.0, 0.0)));
        residue
    }

    #[test]
    fn chain_new_has_no_organism() {
        let chain = Chain::new("A");

        assert_eq!(chain.id, "A");
        assert!(chain.is_empty());
        assert!(!chain.has_organism());
    }

    #[test]
    fn amino_acids_skip_water_and_hetero_residues() {
        let mut chain = Chain::new("A");
        chain.add_residue(amino(1, AminoAcid::MET));
        chain.add_residue(Residue::new(2, None, "HOH", ResidueKind::Water));
        chain.add_residue(amino(3, AminoAcid::LYS));
        chain.add_residue(Residue::new(4, None, "HEM", ResidueKind::Hetero));

        let seqs: Vec<i32> = chain.amino_acids().map(|r| r.seq_num).collect();

        assert_eq!(seqs, vec![1, 3]);
        assert_eq!(chain.amino_acid_count(), 2);
        assert_eq!(chain.residue_count(), 4);
        assert_eq!(chain.sequence(), "MK");
    }

    #[test]
    fn residue_lookup_respects_insertion_code() {
        let mut chain = Chain::new("B");
        chain.add_residue(amino(10, AminoAcid::ALA));
        let mut inserted = amino(10, AminoAcid::GLY);
        inserted.insertion_code = Some('A');
        chain.add_residue(inserted);

        assert_eq!(chain.residue(10, None).unwrap().name, "ALA");
        assert_eq!(chain.residue(10, Some('A')).unwrap().name, "GLY");
        assert!(chain.residue(11, None).is_none());
    }

    #[test]
    fn iter_atoms_visits_every_residue() {
        let mut chain = Chain::new("A");
        chain.add_residue(amino(1, AminoAcid::ALA));
        chain.add_residue(amino(2, AminoAcid::GLY));

        assert_eq!(chain.iter_atoms().count(), 2);
    }
}
