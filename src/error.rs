use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowTagError {
    #[error("file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to load lookup table {} at row {row}: {reason}", path.display())]
    LoadFailure {
        path: PathBuf,
        row: u64,
        reason: String,
    },

    #[error("failed to read {}: {source}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, FlowTagError>;
