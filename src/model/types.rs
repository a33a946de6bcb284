use std::fmt;
use std::str::FromStr;

pub type Point = nalgebra::Point3<f64>;

/// Amino acids recognized in structure files, keyed by their canonical three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    ALA,
    ARG,
    ASN,
    ASP,
    CYS,
    GLN,
    GLU,
    GLY,
    HIS,
    ILE,
    LEU,
    LYS,
    MET,
    PHE,
    PRO,
    SER,
    THR,
    TRP,
    TYR,
    VAL,
    SEC,
    PYL,
    /// Asparagine or aspartate, unresolved.
    ASX,
    /// Glutamine or glutamate, unresolved.
    GLX,
    UNK,
}

/// Chemical kind of a residue. Only `AminoAcid` residues take part in sequence
/// confirmation and contact detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueKind {
    AminoAcid(AminoAcid),
    Nucleotide,
    Water,
    Hetero,
}

impl AminoAcid {
    pub fn one_letter_code(&self) -> char {
        match self {
            AminoAcid::ALA => 'A',
            AminoAcid::ARG => 'R',
            AminoAcid::ASN => 'N',
            AminoAcid::ASP => 'D',
            AminoAcid::CYS => 'C',
            AminoAcid::GLN => 'Q',
            AminoAcid::GLU => 'E',
            AminoAcid::GLY => 'G',
            AminoAcid::HIS => 'H',
            AminoAcid::ILE => 'I',
            AminoAcid::LEU => 'L',
            AminoAcid::LYS => 'K',
            AminoAcid::MET => 'M',
            AminoAcid::PHE => 'F',
            AminoAcid::PRO => 'P',
            AminoAcid::SER => 'S',
            AminoAcid::THR => 'T',
            AminoAcid::TRP => 'W',
            AminoAcid::TYR => 'Y',
            AminoAcid::VAL => 'V',
            AminoAcid::SEC => 'U',
            AminoAcid::PYL => 'O',
            AminoAcid::ASX => 'B',
            AminoAcid::GLX => 'Z',
            AminoAcid::UNK => 'X',
        }
    }

    pub fn from_one_letter_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'A' => Some(AminoAcid::ALA),
            'R' => Some(AminoAcid::ARG),
            'N' => Some(AminoAcid::ASN),
            'D' => Some(AminoAcid::ASP),
            'C' => Some(AminoAcid::CYS),
            'Q' => Some(AminoAcid::GLN),
            'E' => Some(AminoAcid::GLU),
            'G' => Some(AminoAcid::GLY),
            'H' => Some(AminoAcid::HIS),
            'I' => Some(AminoAcid::ILE),
            'L' => Some(AminoAcid::LEU),
            'K' => Some(AminoAcid::LYS),
            'M' => Some(AminoAcid::MET),
            'F' => Some(AminoAcid::PHE),
            'P' => Some(AminoAcid::PRO),
            'S' => Some(AminoAcid::SER),
            'T' => Some(AminoAcid::THR),
            'W' => Some(AminoAcid::TRP),
            'Y' => Some(AminoAcid::TYR),
            'V' => Some(AminoAcid::VAL),
            'U' => Some(AminoAcid::SEC),
            'O' => Some(AminoAcid::PYL),
            'B' => Some(AminoAcid::ASX),
            'Z' => Some(AminoAcid::GLX),
            'X' => Some(AminoAcid::UNK),
            _ => None,
        }
    }
}

impl ResidueKind {
    pub fn amino_acid(&self) -> Option<AminoAcid> {
        match self {
            ResidueKind::AminoAcid(aa) => Some(*aa),
            ResidueKind::Nucleotide | ResidueKind::Water | ResidueKind::Hetero => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResidueKind::AminoAcid(_) => "AminoAcid",
            ResidueKind::Nucleotide => "Nucleotide",
            ResidueKind::Water => "Water",
            ResidueKind::Hetero => "Hetero",
        }
    }
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidueKind::AminoAcid(aa) => write!(f, "AminoAcid({})", aa),
            _ => write!(f, "{}", self.name()),
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = match self {
            AminoAcid::ALA => "ALA",
            AminoAcid::ARG => "ARG",
            AminoAcid::ASN => "ASN",
            AminoAcid::ASP => "ASP",
            AminoAcid::CYS => "CYS",
            AminoAcid::GLN => "GLN",
            AminoAcid::GLU => "GLU",
            AminoAcid::GLY => "GLY",
            AminoAcid::HIS => "HIS",
            AminoAcid::ILE => "ILE",
            AminoAcid::LEU => "LEU",
            AminoAcid::LYS => "LYS",
            AminoAcid::MET => "MET",
            AminoAcid::PHE => "PHE",
            AminoAcid::PRO => "PRO",
            AminoAcid::SER => "SER",
            AminoAcid::THR => "THR",
            AminoAcid::TRP => "TRP",
            AminoAcid::TYR => "TYR",
            AminoAcid::VAL => "VAL",
            AminoAcid::SEC => "SEC",
            AminoAcid::PYL => "PYL",
            AminoAcid::ASX => "ASX",
            AminoAcid::GLX => "GLX",
            AminoAcid::UNK => "UNK",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for AminoAcid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALA" => Ok(AminoAcid::ALA),
            "ARG" => Ok(AminoAcid::ARG),
            "ASN" => Ok(AminoAcid::ASN),
            "ASP" => Ok(AminoAcid::ASP),
            "CYS" => Ok(AminoAcid::CYS),
            "GLN" => Ok(AminoAcid::GLN),
            "GLU" => Ok(AminoAcid::GLU),
            "GLY" => Ok(AminoAcid::GLY),
            "HIS" => Ok(AminoAcid::HIS),
            "ILE" => Ok(AminoAcid::ILE),
            "LEU" => Ok(AminoAcid::LEU),
            "LYS" => Ok(AminoAcid::LYS),
            "MET" => Ok(AminoAcid::MET),
            "PHE" => Ok(AminoAcid::PHE),
            "PRO" => Ok(AminoAcid::PRO),
            "SER" => Ok(AminoAcid::SER),
            "THR" => Ok(AminoAcid::THR),
            "TRP" => Ok(AminoAcid::TRP),
            "TYR" => Ok(AminoAcid::TYR),
            "VAL" => Ok(AminoAcid::VAL),
            "SEC" => Ok(AminoAcid::SEC),
            "PYL" => Ok(AminoAcid::PYL),
            "ASX" => Ok(AminoAcid::ASX),
            "GLX" => Ok(AminoAcid::GLX),
            "UNK" => Ok(AminoAcid::UNK),
            _ => Err(format!("Invalid amino acid: {}", s)),
        }
    }
}
