//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound { path: PathBuf },

    /// No measurement file could be located
    #[error("{kind} file not found for '{basename}' in {}", .dir.display())]
    MeasurementNotFound {
        kind: &'static str,
        basename: String,
        dir: PathBuf,
    },

    /// Output names are derived from the RAW file name
    #[error("RAW file name {} does not end in '{suffix}'", .path.display())]
    UnexpectedRawName { path: PathBuf, suffix: String },

    /// Measurement directory listing failed
    #[error(transparent)]
    Ingestion(#[from] ingestion::IngestionError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn measurement_not_found(
        kind: &'static str,
        basename: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self::MeasurementNotFound {
            kind,
            basename: basename.into(),
            dir: dir.into(),
        }
    }
}
