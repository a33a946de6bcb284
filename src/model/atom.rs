//! Atom representation: a crystallographic label bound to a Cartesian position.
//!
//! Atoms are the unit of geometry for contact detection. Two residues are as close as
//! their closest pair of atoms, so the distance helpers here sit on the hot path of the
//! pairwise scan and stay free of allocation.

use super::types::Point;
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom position as read from a structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in the coordinate record (e.g., `CA`).
    pub name: SmolStr,
    /// Cartesian coordinates, in the units of the source file (ångströms for PDB).
    pub pos: Point,
}

impl Atom {
    /// Creates a new atom from a name and position.
    ///
    /// # Arguments
    ///
    /// * `name` - Atom label such as `"CA"` or `"OXT"`.
    /// * `pos` - Cartesian coordinates.
    pub fn new(name: &str, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            pos,
        }
    }

    /// Squared Euclidean distance to another atom.
    ///
    /// Use this when comparing against a cutoff to skip the square root.
    pub fn distance_squared(&self, other: &Atom) -> f64 {
        nalgebra::distance_squared(&self.pos, &other.pos)
    }

    /// Euclidean distance to another atom.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name, self.pos.x, self.pos.y, self.pos.z
        )
    }
}
