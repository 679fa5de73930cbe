//! BIDS-like filename attributes.
//!
//! `sub-01_sample-3b_chunk-2_spim.h5` carries the attributes
//! `sub=01`, `sample=3b`, `chunk=2` and the bare suffix `spim`.

use std::fmt;

use crate::error::InfoError;

/// Attributes parsed from a filename, in filename order.
///
/// A later duplicate key replaces the earlier value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileKeys {
    entries: Vec<(String, Option<String>)>,
}

impl FileKeys {
    /// `Some(None)` for a bare attribute, `None` when absent.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// The value of `key`, flattening bare and absent to `None`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, value: Option<&str>) {
        let value = value.map(str::to_string);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

/// Parse the attributes of a filename.
///
/// Only the last path component counts, up to its first `.`. Attributes are
/// separated by `_`; each splits on its first `-` into key and value.
///
/// ```
/// use spimio_info::name_to_keys;
///
/// let keys = name_to_keys("sub-01/sub-01_sample-3b_chunk-2_spim.h5");
/// assert_eq!(keys.value("sub"), Some("01"));
/// assert_eq!(keys.value("sample"), Some("3b"));
/// assert_eq!(keys.get("spim"), Some(None));
/// assert_eq!(keys.get("stain"), None);
/// ```
pub fn name_to_keys(filename: &str) -> FileKeys {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    let head = basename.split('.').next().unwrap_or(basename);

    let mut keys = FileKeys::default();
    for attr in head.split('_') {
        match attr.split_once('-') {
            Some((key, value)) => keys.insert(key, Some(value)),
            None => keys.insert(attr, None),
        }
    }
    keys
}

/// Slab number taken from a `sample` attribute.
///
/// Only the leading digits count: `3b` is slab 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlabIndex(pub u32);

impl SlabIndex {
    /// ```
    /// use spimio_info::SlabIndex;
    ///
    /// assert_eq!(SlabIndex::parse("3b").unwrap(), SlabIndex(3));
    /// assert_eq!(SlabIndex::parse("012").unwrap(), SlabIndex(12));
    /// assert!(SlabIndex::parse("b3").is_err());
    /// ```
    pub fn parse(sample: &str) -> Result<Self, InfoError> {
        let end = sample
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(sample.len());
        sample[..end]
            .parse()
            .map(SlabIndex)
            .map_err(|_| InfoError::SlabIndex(sample.to_string()))
    }
}

impl fmt::Display for SlabIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
