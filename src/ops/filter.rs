//! Structure- and chain-level admission rules applied before sequence confirmation.
//!
//! A structure is admitted when its experimental resolution is known and fine enough,
//! and at least one of its chains comes from the target organism.

use crate::config::ExtractConfig;
use crate::model::chain::Chain;
use crate::model::structure::Structure;
use std::fmt;

/// Admission thresholds for structures and chains.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Largest accepted resolution in ångströms (inclusive).
    pub max_resolution: f64,
    /// Organism common name, compared against the upper-cased chain metadata.
    pub organism: String,
    /// Optional organism scientific name accepted as an alternative.
    pub organism_scientific: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::from(&ExtractConfig::default())
    }
}

impl From<&ExtractConfig> for FilterConfig {
    fn from(config: &ExtractConfig) -> Self {
        Self {
            max_resolution: config.max_resolution,
            organism: config.organism.trim().to_ascii_uppercase(),
            organism_scientific: config
                .organism_scientific
                .as_deref()
                .map(|s| s.trim().to_ascii_uppercase()),
        }
    }
}

/// Reason a structure was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The entry reports no resolution (e.g. NMR ensembles).
    MissingResolution,
    /// The reported resolution exceeds the configured maximum.
    ResolutionTooCoarse,
    /// No chain carries the target organism.
    NoMatchingOrganism,
}

impl Rejection {
    pub fn is_resolution(&self) -> bool {
        matches!(self, Rejection::MissingResolution | Rejection::ResolutionTooCoarse)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rejection::MissingResolution => "no resolution reported",
            Rejection::ResolutionTooCoarse => "resolution above limit",
            Rejection::NoMatchingOrganism => "no chain from the target organism",
        };
        f.write_str(text)
    }
}

/// Decides whether a structure takes part in confirmation.
///
/// # Arguments
///
/// * `structure` - Parsed structure with header metadata.
/// * `config` - Resolution and organism requirements.
///
/// # Returns
///
/// `Ok(())` when the resolution is present and `<= max_resolution` and at least one
/// chain passes [`accept_chain`].
///
/// # Errors
///
/// Returns the [`Rejection`] that applied first; resolution is checked before organism.
pub fn accept_structure(structure: &Structure, config: &FilterConfig) -> Result<(), Rejection> {
    match structure.resolution {
        None => return Err(Rejection::MissingResolution),
        Some(resolution) if resolution.is_nan() || resolution > config.max_resolution => {
            return Err(Rejection::ResolutionTooCoarse);
        }
        Some(_) => {}
    }

    if structure.iter_chains().any(|chain| accept_chain(chain, config)) {
        Ok(())
    } else {
        Err(Rejection::NoMatchingOrganism)
    }
}

/// Decides whether a chain comes from the target organism.
///
/// A chain without organism metadata is rejected. The common name matches when it
/// equals the target or when one of its whitespace-separated words does. When a
/// scientific name is configured, an equal scientific name also matches.
pub fn accept_chain(chain: &Chain, config: &FilterConfig) -> bool {
    if !chain.has_organism() {
        return false;
    }

    let common_matches = chain.organism_common.as_deref().is_some_and(|common| {
        let common = common.to_ascii_uppercase();
        common == config.organism || common.split_whitespace().any(|word| word == config.organism)
    });

    let scientific_matches = match (&config.organism_scientific, &chain.organism_scientific) {
        (Some(target), Some(name)) => name.eq_ignore_ascii_case(target),
        _ => false,
    };

    common_matches || scientific_matches
}
