//! The archive capability the adapter holds.
//!
//! A session is bound to one dandiset (and optionally one version). It
//! answers two questions: which assets live under a path prefix, and which
//! asset lives at exactly one path. Authentication, pagination and HTTP are
//! the implementation's business.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// One remotely stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Full slash-separated path inside the dandiset.
    pub path: String,
    /// Signed or temporary URL the content can be fetched from.
    #[serde(default)]
    pub download_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Asset {
    pub fn new(path: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            download_url: download_url.into(),
            size: None,
        }
    }
}

/// Session bound to a single dandiset.
pub trait ArchiveSession: Send + Sync {
    /// Dandiset identifier, e.g. `000026`.
    fn identifier(&self) -> &str;

    /// Version, or `None` for the draft.
    fn version_id(&self) -> Option<&str>;

    /// All assets whose path starts with `prefix`, as plain string prefix.
    ///
    /// `prefix = "sub-01"` also returns `sub-010/...`; callers filter.
    fn get_assets_with_path_prefix(&self, prefix: &str) -> Result<Vec<Asset>, SessionError>;

    /// The asset at exactly `path`, or [`SessionError::NotFound`].
    fn get_asset_by_path(&self, path: &str) -> Result<Asset, SessionError>;
}

impl<S: ArchiveSession + ?Sized> ArchiveSession for Arc<S> {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }

    fn version_id(&self) -> Option<&str> {
        (**self).version_id()
    }

    fn get_assets_with_path_prefix(&self, prefix: &str) -> Result<Vec<Asset>, SessionError> {
        (**self).get_assets_with_path_prefix(prefix)
    }

    fn get_asset_by_path(&self, path: &str) -> Result<Asset, SessionError> {
        (**self).get_asset_by_path(path)
    }
}

/// Something that opens sessions by dandiset id.
pub trait ArchiveClient {
    fn get_dandiset(
        &self,
        id: &DandisetId,
        version: Option<&str>,
    ) -> Result<Box<dyn ArchiveSession>, SessionError>;
}

/// Dandiset identifier. Numeric ids are zero-padded to six digits.
///
/// ```
/// use spimio_dandi::DandisetId;
///
/// assert_eq!(DandisetId::from(26u32).as_str(), "000026");
/// assert_eq!(DandisetId::from("000026"), DandisetId::from(26u32));
/// assert_eq!(DandisetId::from("26").as_str(), "000026");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DandisetId(String);

impl DandisetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u32> for DandisetId {
    fn from(n: u32) -> Self {
        DandisetId(format!("{n:06}"))
    }
}

impl From<&str> for DandisetId {
    fn from(s: &str) -> Self {
        if !s.is_empty() && s.len() < 6 && s.bytes().all(|b| b.is_ascii_digit()) {
            DandisetId(format!("{s:0>6}"))
        } else {
            DandisetId(s.to_string())
        }
    }
}

impl From<String> for DandisetId {
    fn from(s: String) -> Self {
        DandisetId::from(s.as_str())
    }
}

impl fmt::Display for DandisetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
