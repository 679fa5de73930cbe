//! Globbing against an inferred tree, end to end through the public API.

use std::collections::HashSet;
use std::sync::Arc;

use rstest::{fixture, rstest};
use spimio_vfs::{MemoryBackend, PurePath, RemotePath, SelectorCache, VfsError};

type Path = RemotePath<MemoryBackend>;

#[fixture]
fn root() -> Path {
    let store = MemoryBackend::from_files([
        "sub-01/ses-1/a.h5",
        "sub-01/ses-1/a.json",
        "sub-01/ses-2/b.h5",
    ]);
    RemotePath::with_remote("", Arc::new(store))
}

fn strings(paths: Vec<Path>) -> Vec<String> {
    paths.into_iter().map(|p| p.to_string()).collect()
}

#[rstest]
fn directory_queries(root: Path) {
    let sub = root.join("sub-01");
    assert!(sub.is_dir().unwrap());
    assert!(!sub.is_file().unwrap());
    assert!(sub.exists().unwrap());
    assert_eq!(strings(sub.iterdir().unwrap()), vec!["sub-01/ses-1", "sub-01/ses-2"]);
}

#[rstest]
fn file_queries(root: Path) {
    let file = root.join("sub-01/ses-1/a.h5");
    assert!(file.exists().unwrap());
    assert!(file.is_file().unwrap());
    assert!(!file.is_dir().unwrap());
    assert!(matches!(file.iterdir(), Err(VfsError::NotADirectory(_))));
}

#[rstest]
fn recursive_h5(root: Path) {
    assert_eq!(
        strings(root.glob("sub-01/**/*.h5").unwrap()),
        vec!["sub-01/ses-1/a.h5", "sub-01/ses-2/b.h5"]
    );
}

#[rstest]
#[case::all_sessions("sub-01/*", &["sub-01/ses-1", "sub-01/ses-2"])]
#[case::one_session_json("sub-01/ses-1/*.json", &["sub-01/ses-1/a.json"])]
#[case::question("sub-0?/ses-?/b.*", &["sub-01/ses-2/b.h5"])]
#[case::class("*/ses-[2-9]/*", &["sub-01/ses-2/b.h5"])]
#[case::precise_file("sub-01/ses-1/a.h5", &["sub-01/ses-1/a.h5"])]
#[case::missing("sub-02/**", &[])]
fn patterns(root: Path, #[case] pattern: &str, #[case] expected: &[&str]) {
    assert_eq!(strings(root.glob(pattern).unwrap()), expected);
}

#[rstest]
fn results_carry_the_handle(root: Path) {
    for found in root.rglob("*.json").unwrap() {
        assert!(Arc::ptr_eq(found.remote().unwrap(), root.remote().unwrap()));
        assert!(found.is_file().unwrap());
    }
}

#[rstest]
fn rglob_from_subdirectory(root: Path) {
    let found: HashSet<String> = strings(root.join("sub-01").rglob("a.*").unwrap())
        .into_iter()
        .collect();
    assert_eq!(
        found,
        HashSet::from(["sub-01/ses-1/a.h5".to_string(), "sub-01/ses-1/a.json".to_string()])
    );
}

#[test]
fn globstar_depths_yield_distinct_paths() {
    let store = MemoryBackend::from_files(["x.h5", "a/b/x.h5", "a/b/c/x.h5", "a/b/c/y.h5"]);
    let root: Path = RemotePath::with_remote("", Arc::new(store));
    let found = strings(root.glob("**/x.h5").unwrap());
    assert_eq!(found.len(), 3);
    assert_eq!(found.iter().collect::<HashSet<_>>().len(), 3);
}

#[test]
fn private_cache_is_independent() {
    let cache = SelectorCache::new();
    let store = MemoryBackend::from_files(["a/b.h5"]);
    let root: Path = RemotePath::with_remote("", Arc::new(store));
    let found = root.glob_with(&cache, "a/*.h5").unwrap();
    assert_eq!(found, vec![PurePath::new("a/b.h5")]);
    assert_eq!(cache.len(), 3);
}

#[test]
fn bad_patterns_surface_immediately() {
    let root: Path = RemotePath::with_remote("", Arc::new(MemoryBackend::from_files(["a"])));
    assert!(matches!(root.glob(""), Err(VfsError::Pattern(_))));
    assert!(matches!(root.glob("/a"), Err(VfsError::Pattern(_))));
    assert!(matches!(root.glob("a**"), Err(VfsError::Pattern(_))));
}
