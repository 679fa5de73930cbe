//! Local directory backend.
//!
//! Exposes a directory on disk through the same [`Backend`] primitives as a
//! remote store, so local datasets can be globbed with the same selectors.

use std::io;
use std::path::{Path, PathBuf};

use crate::backend::{Backend, DirEntry};
use crate::error::VfsError;
use crate::path::PurePath;

/// A directory tree on the local filesystem.
///
/// All paths are relative to `root`; a leading `/` is ignored, so `/a.h5`
/// and `a.h5` name the same file. Read-only.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk location of `path`.
    pub fn resolve(&self, path: &PurePath) -> PathBuf {
        let mut full = self.root.clone();
        for segment in path.segments() {
            full.push(segment);
        }
        full
    }
}

fn io_error(err: io::Error, path: &PurePath) -> VfsError {
    match err.kind() {
        io::ErrorKind::NotFound => VfsError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => VfsError::PermissionDenied(path.to_string()),
        _ => VfsError::backend(err),
    }
}

impl Backend for LocalBackend {
    fn is_dir(&self, path: &PurePath) -> Result<bool, VfsError> {
        Ok(self.resolve(path).is_dir())
    }

    fn is_file(&self, path: &PurePath) -> Result<bool, VfsError> {
        Ok(self.resolve(path).is_file())
    }

    fn list_children(&self, path: &PurePath) -> Result<Vec<DirEntry>, VfsError> {
        let full = self.resolve(path);
        if !full.is_dir() {
            return Err(VfsError::NotADirectory(path.to_string()));
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&full).map_err(|e| io_error(e, path))? {
            let entry = entry.map_err(|e| io_error(e, path))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // Follows symlinks, like is_dir
            let child = path.child(&name);
            if entry.path().is_dir() {
                entries.push(DirEntry::directory(child));
            } else {
                entries.push(DirEntry::file(child));
            }
        }

        // read_dir order is unspecified
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(entries)
    }
}
