use crate::model::types::{AminoAcid, ResidueKind};
use std::collections::HashMap;

/// Modified amino acids that appear as their parent residue in a protein sequence.
const MODIFIED_AMINO_ACIDS: &[(&str, AminoAcid)] = &[
    ("AIB", AminoAcid::ALA),
    ("ALM", AminoAcid::ALA),
    ("DAL", AminoAcid::ALA),
    ("MAA", AminoAcid::ALA),
    ("AGM", AminoAcid::ARG),
    ("ARM", AminoAcid::ARG),
    ("DAR", AminoAcid::ARG),
    ("HAR", AminoAcid::ARG),
    ("MEN", AminoAcid::ASN),
    ("IAS", AminoAcid::ASP),
    ("DAS", AminoAcid::ASP),
    ("BHD", AminoAcid::ASP),
    ("CAS", AminoAcid::CYS),
    ("CME", AminoAcid::CYS),
    ("CSD", AminoAcid::CYS),
    ("CSO", AminoAcid::CYS),
    ("CSS", AminoAcid::CYS),
    ("CSX", AminoAcid::CYS),
    ("OCS", AminoAcid::CYS),
    ("SMC", AminoAcid::CYS),
    ("CGU", AminoAcid::GLU),
    ("PCA", AminoAcid::GLU),
    ("DGL", AminoAcid::GLU),
    ("DGN", AminoAcid::GLN),
    ("SAR", AminoAcid::GLY),
    ("GL3", AminoAcid::GLY),
    ("HIC", AminoAcid::HIS),
    ("MHS", AminoAcid::HIS),
    ("NEP", AminoAcid::HIS),
    ("DHI", AminoAcid::HIS),
    ("HID", AminoAcid::HIS),
    ("HIE", AminoAcid::HIS),
    ("HIP", AminoAcid::HIS),
    ("DIL", AminoAcid::ILE),
    ("MLE", AminoAcid::LEU),
    ("NLE", AminoAcid::LEU),
    ("DLE", AminoAcid::LEU),
    ("ALY", AminoAcid::LYS),
    ("KCX", AminoAcid::LYS),
    ("LLP", AminoAcid::LYS),
    ("M3L", AminoAcid::LYS),
    ("MLY", AminoAcid::LYS),
    ("MLZ", AminoAcid::LYS),
    ("DLY", AminoAcid::LYS),
    ("MSE", AminoAcid::MET),
    ("FME", AminoAcid::MET),
    ("CXM", AminoAcid::MET),
    ("DPN", AminoAcid::PHE),
    ("HYP", AminoAcid::PRO),
    ("DPR", AminoAcid::PRO),
    ("SEP", AminoAcid::SER),
    ("DSN", AminoAcid::SER),
    ("TPO", AminoAcid::THR),
    ("DTH", AminoAcid::THR),
    ("TRO", AminoAcid::TRP),
    ("DTR", AminoAcid::TRP),
    ("PTR", AminoAcid::TYR),
    ("TYS", AminoAcid::TYR),
    ("DTY", AminoAcid::TYR),
    ("DVA", AminoAcid::VAL),
    ("CSE", AminoAcid::SEC),
];

const NUCLEOTIDES: &[&str] = &[
    "A", "C", "G", "U", "I", "N", "DA", "DC", "DG", "DT", "DI", "DU", "DN",
];

const WATERS: &[&str] = &["HOH", "WAT", "H2O", "DOD", "SOL"];

/// Residue-name classifier shared by the structure readers.
#[derive(Debug, Clone)]
pub struct IoContext {
    kinds: HashMap<String, ResidueKind>,
}

impl IoContext {
    pub fn new_default() -> Self {
        let mut kinds = HashMap::new();

        for code in "ARNDCQEGHILKMFPSTWYVUOBZX".chars() {
            if let Some(aa) = AminoAcid::from_one_letter_code(code) {
                kinds.insert(aa.to_string(), ResidueKind::AminoAcid(aa));
            }
        }
        for (name, parent) in MODIFIED_AMINO_ACIDS {
            kinds.insert(name.to_string(), ResidueKind::AminoAcid(*parent));
        }
        for name in NUCLEOTIDES {
            kinds.insert(name.to_string(), ResidueKind::Nucleotide);
        }
        for name in WATERS {
            kinds.insert(name.to_string(), ResidueKind::Water);
        }

        Self { kinds }
    }

    /// Registers or overrides the classification of a residue name.
    pub fn add_residue<S: Into<String>>(&mut self, name: S, kind: ResidueKind) {
        self.kinds.insert(name.into().to_ascii_uppercase(), kind);
    }

    /// Classifies a residue name.
    ///
    /// Unknown names in polymer (`ATOM`) records are unknown amino acids; unknown names
    /// in `HETATM` records are hetero groups.
    pub fn classify_residue(&self, name: &str, is_hetatm: bool) -> ResidueKind {
        match self.kinds.get(&name.trim().to_ascii_uppercase()) {
            Some(kind) => *kind,
            None if is_hetatm => ResidueKind::Hetero,
            None => ResidueKind::AminoAcid(AminoAcid::UNK),
        }
    }
}

impl Default for IoContext {
    fn default() -> Self {
        Self::new_default()
    }
}
