//! spimio-vfs: hierarchical paths over flat remote stores.
//!
//! Provides:
//! - **PurePath**: POSIX path algebra (parse, join, parent, relative_to,
//!   with_name, with_suffix) with no I/O
//! - **RemotePath**: a pure path plus a shared handle to a [`Backend`]
//! - **Backend**: the three primitives a store must answer: is_dir,
//!   is_file, list_children (exists derives from them)
//! - **Selector** / **SelectorCache**: glob patterns compiled into selector
//!   chains and driven against a backend
//! - **MemoryBackend**: a flat in-memory listing exposed as a tree
//! - **LocalBackend**: a directory on disk, for local copies of a dataset
//!
//! Remote stores often have no directories at all, only full paths. A
//! backend synthesizes pseudo-directories from path prefixes; there are no
//! empty directories.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spimio_vfs::{MemoryBackend, RemotePath};
//!
//! let store = Arc::new(MemoryBackend::from_files([
//!     "sub-01/ses-1/a.h5",
//!     "sub-01/ses-2/b.h5",
//! ]));
//! let root = RemotePath::with_remote("", store);
//!
//! let found: Vec<String> = root
//!     .glob("sub-01/**/*.h5")
//!     .unwrap()
//!     .iter()
//!     .map(|p| p.to_string())
//!     .collect();
//! assert_eq!(found, ["sub-01/ses-1/a.h5", "sub-01/ses-2/b.h5"]);
//! ```

mod backend;
mod error;
mod local;
mod memory;
mod path;
mod remote;
mod selector;
mod tree;

pub use backend::{Backend, DirEntry, EntryKind};
pub use error::{PathError, PatternError, VfsError};
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use path::{PurePath, SEP};
pub use remote::{Parents, PathArg, RemoteEntry, RemotePath};
pub use selector::{Selector, SelectorCache};
pub use tree::render_tree;
