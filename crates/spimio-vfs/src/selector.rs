//! Selector chains: glob patterns driven against a live tree.
//!
//! A pattern `a/*/**/x.h5` compiles into one selector per component, each
//! holding its successor for the rest of the pattern:
//!
//! ```text
//! Precise("a") -> Wildcard("*") -> Recursive -> Precise("x.h5") -> Terminating
//! ```
//!
//! Matching walks the tree one component at a time, so a precise component
//! costs a single existence query rather than a listing. Nothing recurses
//! into the backend beyond what the pattern asks for.
//!
//! # Permission policy
//!
//! A [`VfsError::PermissionDenied`] raised while matching a subtree is logged
//! and that subtree contributes no matches. Partially readable trees give
//! partial results instead of failing the whole glob. Every other error
//! propagates.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use spimio_glob::{Component, Pattern, PatternError, split_pattern};

use crate::backend::Backend;
use crate::error::VfsError;
use crate::path::PurePath;
use crate::remote::RemotePath;

#[derive(Debug)]
enum SelectorKind {
    Precise(String),
    Wildcard(Pattern),
    Recursive,
    /// Yields its input unchanged; ends every chain.
    Terminating,
}

/// One compiled pattern component chained to the rest of the pattern.
#[derive(Debug)]
pub struct Selector {
    kind: SelectorKind,
    /// Set when there is a successor: non-final components must be directories.
    dironly: bool,
    successor: Option<Arc<Selector>>,
}

impl Selector {
    fn terminating() -> Self {
        Self {
            kind: SelectorKind::Terminating,
            dironly: false,
            successor: None,
        }
    }

    pub fn dironly(&self) -> bool {
        self.dironly
    }

    /// The selector for the rest of the pattern, if any.
    pub fn successor(&self) -> Option<&Selector> {
        self.successor.as_deref()
    }

    pub fn is_terminating(&self) -> bool {
        matches!(self.kind, SelectorKind::Terminating)
    }

    /// All paths under `start` matched by this chain.
    ///
    /// Yields nothing when `start` is not a directory.
    pub fn select_from<B: Backend + ?Sized>(
        &self,
        start: &RemotePath<B>,
    ) -> Result<Vec<RemotePath<B>>, VfsError> {
        let mut out = Vec::new();
        if start.is_dir()? {
            self.select(start, &mut out)?;
        }
        Ok(out)
    }

    fn select<B: Backend + ?Sized>(
        &self,
        parent: &RemotePath<B>,
        out: &mut Vec<RemotePath<B>>,
    ) -> Result<(), VfsError> {
        let result = match &self.kind {
            SelectorKind::Terminating => {
                out.push(parent.clone());
                Ok(())
            }
            SelectorKind::Precise(name) => self.select_precise(parent, name, out),
            SelectorKind::Wildcard(pattern) => self.select_wildcard(parent, pattern, out),
            SelectorKind::Recursive => self.select_recursive(parent, out),
        };
        skip_denied(result, parent.as_pure())
    }

    fn select_successor<B: Backend + ?Sized>(
        &self,
        path: &RemotePath<B>,
        out: &mut Vec<RemotePath<B>>,
    ) -> Result<(), VfsError> {
        match &self.successor {
            Some(next) => next.select(path, out),
            None => {
                out.push(path.clone());
                Ok(())
            }
        }
    }

    fn select_precise<B: Backend + ?Sized>(
        &self,
        parent: &RemotePath<B>,
        name: &str,
        out: &mut Vec<RemotePath<B>>,
    ) -> Result<(), VfsError> {
        let path = parent.child(name);
        let found = if self.dironly {
            path.is_dir()?
        } else {
            path.exists()?
        };
        if found {
            self.select_successor(&path, out)?;
        }
        Ok(())
    }

    fn select_wildcard<B: Backend + ?Sized>(
        &self,
        parent: &RemotePath<B>,
        pattern: &Pattern,
        out: &mut Vec<RemotePath<B>>,
    ) -> Result<(), VfsError> {
        for entry in parent.scandir()? {
            if self.dironly && !entry.is_dir() {
                continue;
            }
            if pattern.matches(entry.name()) {
                self.select_successor(&entry.path, out)?;
            }
        }
        Ok(())
    }

    fn select_recursive<B: Backend + ?Sized>(
        &self,
        parent: &RemotePath<B>,
        out: &mut Vec<RemotePath<B>>,
    ) -> Result<(), VfsError> {
        let mut dirs = Vec::new();
        iterate_directories(parent, &mut dirs)?;

        // A path reachable from several starting points is yielded once
        let mut yielded: HashSet<PurePath> = HashSet::new();
        let mut found = Vec::new();
        for start in &dirs {
            found.clear();
            self.select_successor(start, &mut found)?;
            for path in found.drain(..) {
                if yielded.insert(path.as_pure().clone()) {
                    out.push(path);
                }
            }
        }
        Ok(())
    }
}

/// `parent` and every directory below it, depth-first, parents first.
fn iterate_directories<B: Backend + ?Sized>(
    parent: &RemotePath<B>,
    dirs: &mut Vec<RemotePath<B>>,
) -> Result<(), VfsError> {
    dirs.push(parent.clone());
    let entries = match parent.scandir() {
        Ok(entries) => entries,
        Err(err) => return skip_denied(Err(err), parent.as_pure()),
    };
    for entry in entries {
        if entry.is_dir() {
            iterate_directories(&entry.path, dirs)?;
        }
    }
    Ok(())
}

fn skip_denied(result: Result<(), VfsError>, path: &PurePath) -> Result<(), VfsError> {
    match result {
        Err(VfsError::PermissionDenied(detail)) => {
            tracing::debug!(%path, %detail, "permission denied, skipping subtree");
            Ok(())
        }
        other => other,
    }
}

/// Compiled selector chains keyed by remaining pattern components.
///
/// Compilation is a pure function of the pattern text, so entries never go
/// stale: the cache is unbounded and only shrinks on [`clear`](Self::clear)
/// or drop. Chains for `a/b/c` and `x/b/c` share the `b/c` tail.
///
/// The internal lock makes a cache safe to share between threads.
#[derive(Debug, Default)]
pub struct SelectorCache {
    entries: RwLock<HashMap<Vec<String>, Arc<Selector>>>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-lifetime cache used by [`RemotePath::glob`].
    pub fn shared() -> &'static SelectorCache {
        static SHARED: OnceLock<SelectorCache> = OnceLock::new();
        SHARED.get_or_init(SelectorCache::new)
    }

    /// Compile a relative pattern, reusing cached chains.
    pub fn compile(&self, pattern: &str) -> Result<Arc<Selector>, PatternError> {
        let components = split_pattern(pattern)?;
        self.build(&components)
    }

    fn build(&self, components: &[String]) -> Result<Arc<Selector>, PatternError> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(components)
        {
            return Ok(hit.clone());
        }

        let selector = match components.split_first() {
            None => Selector::terminating(),
            Some((head, tail)) => {
                let kind = match Component::parse(head)? {
                    Component::Precise(name) => SelectorKind::Precise(name),
                    Component::Wildcard(pattern) => SelectorKind::Wildcard(pattern),
                    Component::Recursive => SelectorKind::Recursive,
                };
                Selector {
                    kind,
                    dironly: !tail.is_empty(),
                    successor: Some(self.build(tail)?),
                }
            }
        };
        tracing::trace!(?components, "compiled selector");

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(entries
            .entry(components.to_vec())
            .or_insert_with(|| Arc::new(selector))
            .clone())
    }

    /// Number of cached chains, tails included.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    fn names<B: ?Sized>(paths: &[RemotePath<B>]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn tree(files: &[&str]) -> RemotePath<MemoryBackend> {
        RemotePath::with_remote("", Arc::new(MemoryBackend::from_files(files.iter().copied())))
    }

    #[test]
    fn same_pattern_same_chain() {
        let cache = SelectorCache::new();
        let a = cache.compile("sub-*/ses-1/*.h5").unwrap();
        let b = cache.compile("sub-*//ses-1/./*.h5").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // three components plus the terminating tail
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn tails_are_shared() {
        let cache = SelectorCache::new();
        let a = cache.compile("a/b/c").unwrap();
        let x = cache.compile("x/b/c").unwrap();
        assert!(std::ptr::eq(a.successor().unwrap(), x.successor().unwrap()));
    }

    #[test]
    fn dironly_unless_last() {
        let cache = SelectorCache::new();
        let chain = cache.compile("a/*").unwrap();
        assert!(chain.dironly());
        let last = chain.successor().unwrap();
        assert!(!last.dironly());
        assert!(last.successor().unwrap().is_terminating());
    }

    #[test]
    fn malformed_patterns() {
        let cache = SelectorCache::new();
        assert_eq!(cache.compile("").unwrap_err(), PatternError::Empty);
        assert!(matches!(cache.compile("/a"), Err(PatternError::Absolute(_))));
        assert!(matches!(
            cache.compile("a/x**"),
            Err(PatternError::InvalidGlobstar(_))
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties() {
        let cache = SelectorCache::new();
        cache.compile("*").unwrap();
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn star_lists_each_child_once() {
        let root = tree(&["d/a", "d/b", "d/c/x"]);
        let mut found = names(&root.join("d").glob("*").unwrap());
        found.sort();
        assert_eq!(found, vec!["d/a", "d/b", "d/c"]);
    }

    #[test]
    fn globstar_dedups() {
        let root = tree(&["x.h5", "a/b/x.h5", "a/b/c/x.h5", "a/y.h5"]);
        let found = root.glob("**/x.h5").unwrap();
        assert_eq!(names(&found), vec!["x.h5", "a/b/x.h5", "a/b/c/x.h5"]);
    }

    #[test]
    fn double_globstar_still_unique() {
        let root = tree(&["a/b/x.h5", "a/x.h5"]);
        let found = names(&root.glob("**/**/x.h5").unwrap());
        let unique: HashSet<_> = found.iter().collect();
        assert_eq!(found.len(), unique.len());
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn trailing_globstar_yields_directories() {
        let root = tree(&["a/b/x.h5", "a/y.h5"]);
        assert_eq!(names(&root.glob("a/**").unwrap()), vec!["a", "a/b"]);
    }

    #[test]
    fn precise_middle_component_must_be_directory() {
        let root = tree(&["a.h5", "a/b.h5"]);
        assert_eq!(names(&root.glob("a/*.h5").unwrap()), vec!["a/b.h5"]);
        assert!(root.glob("a.h5/*").unwrap().is_empty());
    }

    #[test]
    fn wildcard_middle_component_skips_files() {
        let root = tree(&["s1/x.h5", "s2.h5"]);
        assert_eq!(names(&root.glob("s*/x.h5").unwrap()), vec!["s1/x.h5"]);
    }

    #[test]
    fn rglob_is_globstar_prefix() {
        let root = tree(&["a/x.json", "a/b/y.json", "z.json", "a/q.h5"]);
        assert_eq!(
            names(&root.rglob("*.json").unwrap()),
            names(&root.glob("**/*.json").unwrap())
        );
        assert_eq!(names(&root.rglob("*.json").unwrap()).len(), 3);
        assert!(matches!(root.rglob("/abs"), Err(VfsError::Pattern(_))));
    }

    #[test]
    fn permission_denied_subtree_is_skipped() {
        let backend = MemoryBackend::from_files(["open/a.h5", "locked/b.h5", "locked/deep/c.h5"])
            .deny("locked");
        let root = RemotePath::with_remote("", Arc::new(backend));
        assert_eq!(names(&root.glob("**/*.h5").unwrap()), vec!["open/a.h5"]);
        assert_eq!(names(&root.glob("*/*.h5").unwrap()), vec!["open/a.h5"]);
    }

    #[test]
    fn start_not_a_directory_yields_nothing() {
        let root = tree(&["a/b.h5"]);
        assert!(root.join("a/b.h5").glob("*").unwrap().is_empty());
        assert!(root.join("missing").glob("*").unwrap().is_empty());
    }
}
