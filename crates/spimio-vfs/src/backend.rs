//! The capability a remote path queries.

use crate::error::VfsError;
use crate::path::PurePath;

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    /// A directory, real or synthesized from a common prefix.
    Directory,
}

/// A child returned by [`Backend::list_children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the child (parent path plus one segment).
    pub path: PurePath,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn file(path: PurePath) -> Self {
        Self {
            path,
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: PurePath) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
        }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Minimal read-only tree abstraction behind [`RemotePath`](crate::RemotePath).
///
/// Implement this to expose a store as a hierarchy. Stores without real
/// directories infer them: a directory exists iff something exists below
/// it, so there are no empty directories.
///
/// Nothing here caches. Implementations decide what each call costs; a
/// remote one typically pays a round trip per call.
pub trait Backend: Send + Sync {
    /// Check if a path is a directory.
    fn is_dir(&self, path: &PurePath) -> Result<bool, VfsError>;

    /// Check if a path is a file. A missing path is `Ok(false)`, not an error.
    fn is_file(&self, path: &PurePath) -> Result<bool, VfsError>;

    /// List the direct children of a directory.
    ///
    /// Returns [`VfsError::NotADirectory`] when `path` is not a directory.
    fn list_children(&self, path: &PurePath) -> Result<Vec<DirEntry>, VfsError>;

    /// Check if a path exists, as a file or a directory.
    fn exists(&self, path: &PurePath) -> Result<bool, VfsError> {
        Ok(self.is_file(path)? || self.is_dir(path)?)
    }
}
