use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid extraction configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("structure directory '{}' does not exist or is not a directory", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("cannot open output '{}': {source}", path.display())]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: crate::io::Error,
    },

    #[error("failed to write interaction records: {source}")]
    SinkWrite {
        #[source]
        source: std::io::Error,
    },

    #[error("worker pool could not be started: {details}")]
    ThreadPool { details: String },

    #[error(transparent)]
    Io(#[from] crate::io::Error),
}

impl Error {
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    pub fn sink_open(path: impl Into<PathBuf>, source: crate::io::Error) -> Self {
        Self::SinkOpen {
            path: path.into(),
            source,
        }
    }
}
