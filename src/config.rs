//! Extraction parameters, loadable from a TOML file.
//!
//! Every field has a default, so a configuration file only lists what it changes:
//!
//! ```toml
//! pdb_dir = "/data/pdb"
//! contact_threshold = 4.0
//! non_contact_threshold = 20.0
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ID_MAP: &str = "db/pdb/idMap_pdbId_ensemblId_refseqId.txt.gz";
pub const DEFAULT_PDB_DIR: &str = "db/pdb";
pub const INTERACTIONS_FILE_NAME: &str = "interactions.bin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Structure-to-transcript identifier table.
    pub id_map: PathBuf,
    /// Root directory searched recursively for structure files.
    pub pdb_dir: PathBuf,
    /// Directory receiving the interactions file when `output` is unset.
    pub data_dir: PathBuf,
    pub output: Option<PathBuf>,
    /// Optional plain-text dump of every confirmed identifier mapping.
    pub confirmed_map: Option<PathBuf>,
    /// Minimum index distance between two residues of a chain.
    pub min_separation: usize,
    /// Pairs at or below this distance (Å) are contacts.
    pub contact_threshold: f64,
    /// Pairs strictly above this distance (Å) are non-contacts. Disabled when unset.
    pub non_contact_threshold: Option<f64>,
    /// Structures with a coarser resolution (Å) are rejected.
    pub max_resolution: f64,
    /// Organism common name a chain must carry.
    pub organism: String,
    /// Organism scientific name accepted as an alternative to `organism`.
    pub organism_scientific: Option<String>,
    /// Mapping is confirmed while `mismatches / compared` stays strictly below this rate.
    pub max_mismatch_rate: f64,
    /// Chains with more amino acids are skipped.
    pub max_chain_residues: Option<usize>,
    /// Worker threads; `0` uses every available core.
    pub threads: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            id_map: PathBuf::from(DEFAULT_ID_MAP),
            pdb_dir: PathBuf::from(DEFAULT_PDB_DIR),
            data_dir: PathBuf::from("."),
            output: None,
            confirmed_map: None,
            min_separation: 20,
            contact_threshold: 3.0,
            non_contact_threshold: None,
            max_resolution: 3.0,
            organism: "HUMAN".to_string(),
            organism_scientific: None,
            max_mismatch_rate: 0.1,
            max_chain_residues: None,
            threads: 0,
        }
    }
}

impl ExtractConfig {
    /// Loads a configuration file; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`]. The loaded values are
    /// not validated here.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path of the interactions file: `output`, or `<data_dir>/interactions.bin`.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.data_dir.join(INTERACTIONS_FILE_NAME))
    }

    /// Checks that thresholds, rate, resolution and separation are positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("contact_threshold", self.contact_threshold)?;
        if let Some(threshold) = self.non_contact_threshold {
            positive("non_contact_threshold", threshold)?;
        }
        positive("max_resolution", self.max_resolution)?;
        positive("max_mismatch_rate", self.max_mismatch_rate)?;

        if self.min_separation == 0 {
            return Err(ConfigError::InvalidValue {
                field: "min_separation",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.organism.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "organism",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExtractConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.min_separation, 20);
        assert_eq!(config.contact_threshold, 3.0);
        assert_eq!(config.non_contact_threshold, None);
        assert_eq!(config.output_path(), PathBuf::from("./interactions.bin"));
    }

    #[test]
    fn load_overrides_only_listed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract.toml");
        std::fs::write(
            &path,
            "contact_threshold = 4.5\nnon_contact_threshold = 20.0\norganism = \"MOUSE\"\n",
        )
        .unwrap();

        let config = ExtractConfig::load(&path).unwrap();

        assert_eq!(config.contact_threshold, 4.5);
        assert_eq!(config.non_contact_threshold, Some(20.0));
        assert_eq!(config.organism, "MOUSE");
        assert_eq!(config.max_resolution, 3.0);
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract.toml");
        std::fs::write(&path, "contact_treshold = 4.5\n").unwrap();

        assert!(matches!(
            ExtractConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_values() {
        let cases = [
            ExtractConfig {
                contact_threshold: 0.0,
                ..Default::default()
            },
            ExtractConfig {
                non_contact_threshold: Some(-1.0),
                ..Default::default()
            },
            ExtractConfig {
                max_resolution: f64::NAN,
                ..Default::default()
            },
            ExtractConfig {
                max_mismatch_rate: 0.0,
                ..Default::default()
            },
            ExtractConfig {
                min_separation: 0,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be invalid");
        }
    }

    #[test]
    fn explicit_output_wins_over_data_dir() {
        let config = ExtractConfig {
            data_dir: PathBuf::from("/data"),
            output: Some(PathBuf::from("/tmp/out.gz")),
            ..Default::default()
        };

        assert_eq!(config.output_path(), PathBuf::from("/tmp/out.gz"));
    }
}
