//! Error types for path algebra and tree queries.

use thiserror::Error;

pub use spimio_glob::PatternError;

/// Errors from pure path operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("'{0}' has an empty name")]
    EmptyName(String),

    #[error("invalid name {0:?}")]
    InvalidName(String),

    #[error("invalid suffix {0:?}")]
    InvalidSuffix(String),

    #[error("'{path}' does not start with '{other}'")]
    NotRelative { path: String, other: String },

    #[error("parent index {index} out of range ({len} parents)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors from querying a backend through a path.
#[derive(Debug, Error)]
pub enum VfsError {
    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Selectors treat this as "no matches below here" and keep going.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Path(#[from] PathError),

    /// Anything the backend's transport reports. Never retried.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl VfsError {
    /// Wrap a backend-specific error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        VfsError::Backend(Box::new(err))
    }
}
