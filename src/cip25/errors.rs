//! Error types for CIP-25 metadata validation
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The two failure kinds of a validation call: `json` for decode problems
/// and the empty document, `cip25` for schema-rule violations (including the
/// size guard, which the standard's reference behavior files under `cip25`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataErrorKind {
    Json,
    Cip25,
}

impl fmt::Display for MetadataErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            MetadataErrorKind::Json => "json",
            MetadataErrorKind::Cip25 => "cip25",
        };
        write!(f, "{}", key)
    }
}

/// First validation failure of a call. Terminal: no recovery information,
/// no partial results alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct MetadataError {
    pub kind: MetadataErrorKind,
    pub message: String,
}

impl MetadataError {
    pub fn json(message: impl Into<String>) -> Self {
        Self {
            kind: MetadataErrorKind::Json,
            message: message.into(),
        }
    }

    pub fn cip25(message: impl Into<String>) -> Self {
        Self {
            kind: MetadataErrorKind::Cip25,
            message: message.into(),
        }
    }
}

/// Crate-level error for the file and CLI surfaces.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl Error {
    pub fn file_not_found(path: &Path) -> Self {
        Error::FileNotFound(path.to_path_buf())
    }
}
