use super::chain::Chain;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Identifier code from the file header, when present.
    pub id_code: Option<String>,
    /// Experimental resolution in ångströms; `None` for methods that do not report one.
    pub resolution: Option<f64>,
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}'",
            chain.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.iter_atoms().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ id: {}, resolution: {}, chains: {}, residues: {}, atoms: {} }}",
            self.id_code.as_deref().unwrap_or("-"),
            self.resolution
                .map(|r| format!("{r:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            self.chain_count(),
            self.residue_count(),
            self.atom_count()
        )
    }
}

impl FromIterator<Chain> for Structure {
    fn from_iter<T: IntoIterator<Item = Chain>>(iter: T) -> Self {
        Self {
            id_code: None,
            resolution: None,
            chains: iter.into_iter().collect(),
        }
    }
}
