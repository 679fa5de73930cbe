//! In-memory flat store.
//!
//! Holds a list of file paths and infers directories from their prefixes,
//! the same way a remote asset store does. Used for tests and for callers
//! that already hold a full listing.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{Backend, DirEntry};
use crate::error::VfsError;
use crate::path::PurePath;

/// Flat file list exposed as a tree.
///
/// Paths are keyed by segments only; a leading `/` is ignored.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    files: Vec<PurePath>,
    denied: HashSet<PurePath>,
    queries: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from file paths, kept in the given order.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut backend = Self::new();
        for file in files {
            backend.add_file(file.as_ref());
        }
        backend
    }

    pub fn add_file(&mut self, path: &str) {
        let key = PurePath::new(path).strip_root();
        if !self.files.contains(&key) {
            self.files.push(key);
        }
    }

    /// Make listing `path` fail with [`VfsError::PermissionDenied`].
    pub fn deny(mut self, path: &str) -> Self {
        self.denied.insert(PurePath::new(path).strip_root());
        self
    }

    /// Number of backend calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl Backend for MemoryBackend {
    fn is_dir(&self, path: &PurePath) -> Result<bool, VfsError> {
        self.count();
        let key = path.strip_root();
        Ok(self.files.iter().any(|f| f.is_descendant_of(&key)))
    }

    fn is_file(&self, path: &PurePath) -> Result<bool, VfsError> {
        self.count();
        Ok(self.files.contains(&path.strip_root()))
    }

    fn list_children(&self, path: &PurePath) -> Result<Vec<DirEntry>, VfsError> {
        let key = path.strip_root();
        if self.denied.contains(&key) {
            return Err(VfsError::PermissionDenied(path.to_string()));
        }
        if !self.is_dir(path)? {
            return Err(VfsError::NotADirectory(path.to_string()));
        }

        let depth = key.segments().len();
        let mut entries = Vec::new();
        let mut subdirs: Vec<&str> = Vec::new();
        for file in self.files.iter().filter(|f| f.is_descendant_of(&key)) {
            let name = &file.segments()[depth];
            if file.segments().len() == depth + 1 {
                entries.push(DirEntry::file(path.child(name)));
            } else if !subdirs.contains(&name.as_str()) {
                subdirs.push(name);
                entries.push(DirEntry::directory(path.child(name)));
            }
        }
        Ok(entries)
    }
}
