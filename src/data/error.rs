use std::path::PathBuf;

use thiserror::Error;

use super::catalog::FileId;

/// Errors raised while indexing or reading cycler data files.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("failed to read {}: {reason}", .path.display())]
    FileRead { path: PathBuf, reason: String },
    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: String, column: String },
    #[error("no data file with id {0}")]
    InvalidSelection(FileId),
}

impl DataError {
    /// Wrap any displayable error as a [`DataError::FileRead`] for `path`.
    /// Uses the alternate format so `anyhow`-style context chains survive.
    pub fn read(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        DataError::FileRead {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
