//! Volume files, seen through an injected reader.
//!
//! Chunks are multi-resolution HDF5 files whose datasets `0`, `1`, ...
//! hold successive levels. Decoding them is the reader's job; this crate
//! only asks for each level's shape and element type.

use std::fmt;
use std::path::PathBuf;

/// Where a volume can be opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeLocation {
    Local(PathBuf),
    /// Unsigned object-store URL, for range reads.
    Remote(String),
}

impl fmt::Display for VolumeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeLocation::Local(path) => write!(f, "{}", path.display()),
            VolumeLocation::Remote(url) => f.write_str(url),
        }
    }
}

/// One resolution level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelInfo {
    pub shape: Vec<u64>,
    pub dtype: String,
}

impl LevelInfo {
    pub fn new(shape: impl Into<Vec<u64>>, dtype: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            dtype: dtype.into(),
        }
    }
}

/// Error type a reader reports; wrapped into [`InfoError::Volume`](crate::InfoError::Volume).
pub type ReaderError = Box<dyn std::error::Error + Send + Sync>;

/// Reads level metadata out of a volume file.
pub trait VolumeReader: Send + Sync {
    /// Levels in order, finest first.
    fn levels(&self, location: &VolumeLocation) -> Result<Vec<LevelInfo>, ReaderError>;
}
