//! spimio-glob: pattern primitives for globbing remote paths.
//!
//! Provides:
//! - **fnmatch**: shell-style matching of a single path component
//! - **Component**: classification of one pattern component into a
//!   precise name, a wildcard, or the recursive `**`
//! - **split_pattern**: validation and splitting of a whole relative pattern
//!
//! Nothing here touches a filesystem. The selector engine in `spimio-vfs`
//! drives these primitives against a live (virtual) tree.

mod component;
mod fnmatch;

pub use component::{Component, PatternError, split_pattern};
pub use fnmatch::{Pattern, fnmatch, is_wildcard_pattern};
