//! Paths bound to a backend.
//!
//! A [`RemotePath`] is a [`PurePath`] plus an optional shared handle to the
//! [`Backend`] that answers existence and listing queries. The handle rides
//! along explicitly through every derived path and is never compared: two
//! remote paths are equal iff their pure paths are.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::backend::{Backend, EntryKind};
use crate::error::{PathError, VfsError};
use crate::path::PurePath;
use crate::selector::SelectorCache;

/// A path whose filesystem queries go to a shared backend handle.
pub struct RemotePath<B: ?Sized> {
    path: PurePath,
    remote: Option<Arc<B>>,
}

/// One input to [`RemotePath::from_args`] and [`RemotePath::join`].
pub enum PathArg<'a, B: ?Sized> {
    Str(&'a str),
    Pure(&'a PurePath),
    Remote(&'a RemotePath<B>),
}

impl<'a, B: ?Sized> From<&'a str> for PathArg<'a, B> {
    fn from(s: &'a str) -> Self {
        PathArg::Str(s)
    }
}

impl<'a, B: ?Sized> From<&'a String> for PathArg<'a, B> {
    fn from(s: &'a String) -> Self {
        PathArg::Str(s)
    }
}

impl<'a, B: ?Sized> From<&'a PurePath> for PathArg<'a, B> {
    fn from(p: &'a PurePath) -> Self {
        PathArg::Pure(p)
    }
}

impl<'a, B: ?Sized> From<&'a RemotePath<B>> for PathArg<'a, B> {
    fn from(p: &'a RemotePath<B>) -> Self {
        PathArg::Remote(p)
    }
}

impl<B: ?Sized> PathArg<'_, B> {
    fn parse(&self) -> (PurePath, Option<Arc<B>>) {
        match self {
            PathArg::Str(s) => (PurePath::new(s), None),
            PathArg::Pure(p) => ((*p).clone(), None),
            PathArg::Remote(p) => (p.path.clone(), p.remote.clone()),
        }
    }
}

impl<B: ?Sized> RemotePath<B> {
    /// A detached path: every query answers "nothing here".
    pub fn new(s: &str) -> Self {
        Self {
            path: PurePath::new(s),
            remote: None,
        }
    }

    /// Parse a path and attach it to `remote`.
    pub fn with_remote(s: &str, remote: Arc<B>) -> Self {
        Self {
            path: PurePath::new(s),
            remote: Some(remote),
        }
    }

    pub fn from_pure(path: PurePath, remote: Option<Arc<B>>) -> Self {
        Self { path, remote }
    }

    /// Parse and concatenate mixed inputs.
    ///
    /// The handle comes from the first remote input that carries one.
    pub fn from_args<'a, I>(args: I) -> Self
    where
        B: 'a,
        I: IntoIterator,
        I::Item: Into<PathArg<'a, B>>,
    {
        let mut out = Self {
            path: PurePath::default(),
            remote: None,
        };
        for arg in args {
            let (path, remote) = arg.into().parse();
            out.path = out.path.join(&path);
            if out.remote.is_none() {
                out.remote = remote;
            }
        }
        out
    }

    /// Same path, different handle.
    pub fn attach(&self, remote: Arc<B>) -> Self {
        Self {
            path: self.path.clone(),
            remote: Some(remote),
        }
    }

    pub fn remote(&self) -> Option<&Arc<B>> {
        self.remote.as_ref()
    }

    pub fn as_pure(&self) -> &PurePath {
        &self.path
    }

    pub fn into_pure(self) -> PurePath {
        self.path
    }

    fn derive(&self, path: PurePath) -> Self {
        Self {
            path,
            remote: self.remote.clone(),
        }
    }

    /// Join one more part. This path's handle wins; otherwise the part's.
    pub fn join<'a>(&self, part: impl Into<PathArg<'a, B>>) -> Self
    where
        B: 'a,
    {
        let (path, remote) = part.into().parse();
        Self {
            path: self.path.join(&path),
            remote: self.remote.clone().or(remote),
        }
    }

    /// Join several parts, left to right.
    pub fn joinpath<'a, I>(&self, parts: I) -> Self
    where
        B: 'a,
        I: IntoIterator,
        I::Item: Into<PathArg<'a, B>>,
    {
        let mut out = self.clone();
        for part in parts {
            out = out.join(part);
        }
        out
    }

    pub fn child(&self, name: &str) -> Self {
        self.derive(self.path.child(name))
    }

    pub fn parent(&self) -> Self {
        self.derive(self.path.parent())
    }

    /// Strict ancestors, nearest first, produced on demand.
    pub fn parents(&self) -> Parents<B> {
        Parents {
            path: self.path.clone(),
            remote: self.remote.clone(),
            front: 0,
            back: self.path.ancestor_count(),
        }
    }

    pub fn with_name(&self, name: &str) -> Result<Self, PathError> {
        Ok(self.derive(self.path.with_name(name)?))
    }

    pub fn with_suffix(&self, suffix: &str) -> Result<Self, PathError> {
        Ok(self.derive(self.path.with_suffix(suffix)?))
    }

    pub fn relative_to<'a>(&self, other: impl Into<PathArg<'a, B>>) -> Result<Self, PathError>
    where
        B: 'a,
    {
        let (other, _) = other.into().parse();
        Ok(self.derive(self.path.relative_to(&other)?))
    }
}

impl<B: Backend + ?Sized> RemotePath<B> {
    /// Whether anything lives at or below this path.
    pub fn exists(&self) -> Result<bool, VfsError> {
        match &self.remote {
            Some(remote) => remote.exists(&self.path),
            None => Ok(false),
        }
    }

    pub fn is_dir(&self) -> Result<bool, VfsError> {
        match &self.remote {
            Some(remote) => remote.is_dir(&self.path),
            None => Ok(false),
        }
    }

    pub fn is_file(&self) -> Result<bool, VfsError> {
        match &self.remote {
            Some(remote) => remote.is_file(&self.path),
            None => Ok(false),
        }
    }

    /// Direct children with their kinds.
    pub fn scandir(&self) -> Result<Vec<RemoteEntry<B>>, VfsError> {
        let Some(remote) = &self.remote else {
            return Err(VfsError::NotADirectory(self.path.to_string()));
        };
        Ok(remote
            .list_children(&self.path)?
            .into_iter()
            .map(|entry| RemoteEntry {
                path: self.derive(entry.path),
                kind: entry.kind,
            })
            .collect())
    }

    /// Direct children: files first-seen, pseudo-directories deduplicated.
    pub fn iterdir(&self) -> Result<Vec<Self>, VfsError> {
        Ok(self.scandir()?.into_iter().map(|e| e.path).collect())
    }

    /// Every existing path matching a relative pattern below this one.
    ///
    /// Uses the process-wide [`SelectorCache::shared`] cache.
    pub fn glob(&self, pattern: &str) -> Result<Vec<Self>, VfsError> {
        self.glob_with(SelectorCache::shared(), pattern)
    }

    /// [`glob`](Self::glob) with a caller-owned selector cache.
    pub fn glob_with(&self, cache: &SelectorCache, pattern: &str) -> Result<Vec<Self>, VfsError> {
        let selector = cache.compile(pattern)?;
        selector.select_from(self)
    }

    /// `glob("**/" + pattern)`: matches anywhere in the subtree.
    pub fn rglob(&self, pattern: &str) -> Result<Vec<Self>, VfsError> {
        self.rglob_with(SelectorCache::shared(), pattern)
    }

    pub fn rglob_with(&self, cache: &SelectorCache, pattern: &str) -> Result<Vec<Self>, VfsError> {
        if pattern.starts_with('/') {
            return Err(spimio_glob::PatternError::Absolute(pattern.to_string()).into());
        }
        self.glob_with(cache, &format!("**/{pattern}"))
    }
}

/// A child returned by [`RemotePath::scandir`].
pub struct RemoteEntry<B: ?Sized> {
    pub path: RemotePath<B>,
    pub kind: EntryKind,
}

impl<B: ?Sized> RemoteEntry<B> {
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

/// Lazy ancestors of a path, nearest first.
///
/// Holds copies of the parsed parts rather than the path itself.
pub struct Parents<B: ?Sized> {
    path: PurePath,
    remote: Option<Arc<B>>,
    front: usize,
    back: usize,
}

impl<B: ?Sized> Parents<B> {
    /// Indexed access; out-of-range is an error rather than `None`.
    pub fn get(&self, index: usize) -> Result<RemotePath<B>, PathError> {
        let len = self.path.ancestor_count();
        self.path
            .ancestor(index)
            .map(|path| RemotePath {
                path,
                remote: self.remote.clone(),
            })
            .ok_or(PathError::IndexOutOfRange { index, len })
    }
}

impl<B: ?Sized> Iterator for Parents<B> {
    type Item = RemotePath<B>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.get(self.front).ok();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<B: ?Sized> DoubleEndedIterator for Parents<B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.get(self.back).ok()
    }
}

impl<B: ?Sized> ExactSizeIterator for Parents<B> {}

impl<B: ?Sized> Deref for RemotePath<B> {
    type Target = PurePath;

    fn deref(&self) -> &PurePath {
        &self.path
    }
}

impl<B: ?Sized> Clone for RemotePath<B> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            remote: self.remote.clone(),
        }
    }
}

impl<B: ?Sized> PartialEq for RemotePath<B> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<B: ?Sized> Eq for RemotePath<B> {}

impl<B: ?Sized> PartialEq<PurePath> for RemotePath<B> {
    fn eq(&self, other: &PurePath) -> bool {
        &self.path == other
    }
}

impl<B: ?Sized> Hash for RemotePath<B> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl<B: ?Sized> PartialOrd for RemotePath<B> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<B: ?Sized> Ord for RemotePath<B> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl<B: ?Sized> fmt::Display for RemotePath<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.path.fmt(f)
    }
}

impl<B: ?Sized> fmt::Debug for RemotePath<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemotePath")
            .field("path", &self.path.to_string())
            .field("remote", &self.remote.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    type Path = RemotePath<MemoryBackend>;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::from_files(["a/b/c.h5"]))
    }

    #[test]
    fn handle_does_not_affect_equality() {
        let attached = Path::with_remote("a/b", backend());
        let detached = Path::new("a//b");
        assert_eq!(attached, detached);
    }

    #[test]
    fn derived_paths_keep_the_handle() {
        let remote = backend();
        let p = Path::with_remote("a/b/c.h5", remote.clone());
        for derived in [
            p.parent(),
            p.child("x"),
            p.join("y"),
            p.with_name("d.h5").unwrap(),
            p.with_suffix(".json").unwrap(),
            p.relative_to("a").unwrap(),
        ] {
            assert!(Arc::ptr_eq(derived.remote().unwrap(), &remote), "{derived}");
        }
        assert!(p.parents().all(|a| a.remote().is_some()));
    }

    #[test]
    fn join_takes_handle_from_first_carrier() {
        let remote = backend();
        let carrier = Path::with_remote("x", remote.clone());
        let joined = Path::new("base").join(&carrier);
        assert!(Arc::ptr_eq(joined.remote().unwrap(), &remote));
        assert_eq!(joined, Path::new("base/x"));

        let other = backend();
        let own = Path::with_remote("base", other.clone()).join(&carrier);
        assert!(Arc::ptr_eq(own.remote().unwrap(), &other));
    }

    #[test]
    fn from_args_mixes_inputs() {
        let remote = backend();
        let carrier = Path::with_remote("sub-01", remote.clone());
        let pure = PurePath::new("ses-1");
        let p = Path::from_args([
            PathArg::Str("data"),
            PathArg::Remote(&carrier),
            PathArg::Pure(&pure),
        ]);
        assert_eq!(p.to_string(), "data/sub-01/ses-1");
        assert!(p.remote().is_some());
    }

    #[test]
    fn joinpath_matches_nested_join() {
        let p = Path::new("p");
        assert_eq!(p.joinpath(["a", "b"]), p.join("a").join("b"));
    }

    #[test]
    fn parents_len_and_index() {
        let p = Path::new("/a/b/c");
        let parents = p.parents();
        assert_eq!(parents.len(), 3);
        assert_eq!(parents.get(0).unwrap(), Path::new("/a/b"));
        assert_eq!(parents.get(2).unwrap(), Path::new("/"));
        assert_eq!(
            parents.get(3).unwrap_err(),
            PathError::IndexOutOfRange { index: 3, len: 3 }
        );

        let rel: Vec<String> = Path::new("a/b").parents().map(|p| p.to_string()).collect();
        assert_eq!(rel, vec!["a", "."]);

        let reversed: Vec<String> = p.parents().rev().map(|p| p.to_string()).collect();
        assert_eq!(reversed, vec!["/", "/a", "/a/b"]);
    }

    #[test]
    fn detached_paths_answer_nothing() {
        let p = Path::new("a/b/c.h5");
        assert!(!p.exists().unwrap());
        assert!(!p.is_dir().unwrap());
        assert!(!p.is_file().unwrap());
        assert!(matches!(p.iterdir(), Err(VfsError::NotADirectory(_))));
        assert!(p.glob("*").unwrap().is_empty());
    }

    #[test]
    fn deref_exposes_pure_accessors() {
        let p = Path::new("a/b.ome.h5");
        assert_eq!(p.name(), "b.ome.h5");
        assert_eq!(p.suffix(), ".h5");
        assert_eq!(p.stem(), "b.ome");
    }
}
