//! Errors for archive sessions and DANDI paths.

use std::path::PathBuf;

use spimio_vfs::VfsError;
use thiserror::Error;

/// Errors reported by an [`ArchiveSession`](crate::ArchiveSession) or a
/// [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum SessionError {
    /// Point lookup miss.
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("dandiset not found: {0}")]
    UnknownDandiset(String),

    #[error("access denied: {0}")]
    PermissionDenied(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response from {url}")]
    Response {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read manifest {}", path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}", path.display())]
    ManifestFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<SessionError> for VfsError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(path) => VfsError::NotFound(path),
            SessionError::PermissionDenied(path) => VfsError::PermissionDenied(path),
            other => VfsError::backend(other),
        }
    }
}

/// Errors from DANDI-specific path operations.
#[derive(Debug, Error)]
pub enum DandiError {
    #[error("missing dandiset")]
    MissingDandiset,

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Vfs(#[from] VfsError),
}
