//! Errors for metadata extraction.

use std::path::PathBuf;

use spimio_dandi::{DandiError, SessionError};
use spimio_vfs::VfsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfoError {
    #[error("expected h5 or json file: {0}")]
    UnexpectedExtension(String),

    #[error("{file}: filename has no '{key}' attribute")]
    MissingKey { file: String, key: &'static str },

    #[error("slab index has no numeric prefix: {0:?}")]
    SlabIndex(String),

    #[error("several {what} in the same folder: {first} vs {other}")]
    Inconsistent {
        what: &'static str,
        first: String,
        other: String,
    },

    #[error("no volume data: {0}")]
    MissingShape(String),

    #[error("{path}: expected at least 3 dimensions, got {rank}")]
    ShapeRank { path: String, rank: usize },

    #[error("volume has no resolution levels: {0}")]
    NoLevels(String),

    #[error("failed to read volume {location}")]
    Volume {
        location: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("empty transform list: {0}")]
    EmptyTransforms(String),

    #[error("remote access needs a transport: {0}")]
    NoTransport(String),

    #[error("invalid JSON in {location}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error(transparent)]
    Dandi(#[from] DandiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
