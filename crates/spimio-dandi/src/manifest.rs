//! Sessions served from an asset listing.
//!
//! A manifest is a JSON snapshot of one dandiset's assets:
//!
//! ```json
//! {
//!   "dandiset_id": "000026",
//!   "version_id": "draft",
//!   "assets": [
//!     {"path": "sub-01/ses-1/a.h5", "download_url": "https://...", "size": 1024}
//!   ]
//! }
//! ```
//!
//! Queries behave like the archive API: prefix lookups are plain string
//! filters, in listing order.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;
use crate::session::{ArchiveClient, ArchiveSession, Asset, DandisetId};

/// On-disk manifest format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub dandiset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl Manifest {
    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path).map_err(|source| SessionError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SessionError::ManifestFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory archive holding one dandiset.
#[derive(Debug)]
pub struct ManifestArchive {
    manifest: Manifest,
    queries: AtomicUsize,
}

impl ManifestArchive {
    pub fn new(id: impl Into<DandisetId>, version: Option<&str>, assets: Vec<Asset>) -> Self {
        Self::from_manifest(Manifest {
            dandiset_id: id.into().to_string(),
            version_id: version.map(str::to_string),
            assets,
        })
    }

    pub fn from_manifest(manifest: Manifest) -> Self {
        Self {
            manifest,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let manifest = Manifest::load(path)?;
        debug!(
            path = %path.display(),
            dandiset = %manifest.dandiset_id,
            assets = manifest.assets.len(),
            "loaded manifest"
        );
        Ok(Self::from_manifest(manifest))
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Number of session requests served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl ArchiveSession for ManifestArchive {
    fn identifier(&self) -> &str {
        &self.manifest.dandiset_id
    }

    fn version_id(&self) -> Option<&str> {
        self.manifest.version_id.as_deref()
    }

    fn get_assets_with_path_prefix(&self, prefix: &str) -> Result<Vec<Asset>, SessionError> {
        self.count();
        Ok(self
            .manifest
            .assets
            .iter()
            .filter(|a| a.path.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn get_asset_by_path(&self, path: &str) -> Result<Asset, SessionError> {
        self.count();
        self.manifest
            .assets
            .iter()
            .find(|a| a.path == path)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(path.to_string()))
    }
}

/// Client over a single manifest.
///
/// Opening any other dandiset, or a version the manifest was not taken
/// from, fails with [`SessionError::UnknownDandiset`]. Asking for no
/// version opens the manifest as-is.
#[derive(Debug, Clone)]
pub struct ManifestClient {
    manifest: Manifest,
}

impl ManifestClient {
    pub fn new(manifest: Manifest) -> Self {
        Self { manifest }
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        Ok(Self::new(Manifest::load(path)?))
    }
}

impl ArchiveClient for ManifestClient {
    fn get_dandiset(
        &self,
        id: &DandisetId,
        version: Option<&str>,
    ) -> Result<Box<dyn ArchiveSession>, SessionError> {
        let same_id = DandisetId::from(self.manifest.dandiset_id.as_str()) == *id;
        let same_version = match version {
            None => true,
            Some(v) => self.manifest.version_id.as_deref() == Some(v),
        };
        if !same_id || !same_version {
            let label = match version {
                Some(v) => format!("{id}@{v}"),
                None => id.to_string(),
            };
            return Err(SessionError::UnknownDandiset(label));
        }
        Ok(Box::new(ManifestArchive::from_manifest(self.manifest.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn archive() -> ManifestArchive {
        ManifestArchive::new(
            26u32,
            None,
            vec![
                Asset::new("sub-01/a.h5", "https://api/a"),
                Asset::new("sub-010/b.h5", "https://api/b"),
            ],
        )
    }

    #[test]
    fn prefix_is_a_plain_string_filter() {
        let archive = archive();
        let paths: Vec<_> = archive
            .get_assets_with_path_prefix("sub-01")
            .unwrap()
            .into_iter()
            .map(|a| a.path)
            .collect();
        assert_eq!(paths, ["sub-01/a.h5", "sub-010/b.h5"]);
    }

    #[test]
    fn point_lookup_miss_is_not_found() {
        let archive = archive();
        assert!(matches!(
            archive.get_asset_by_path("sub-01"),
            Err(SessionError::NotFound(p)) if p == "sub-01"
        ));
        assert_eq!(archive.query_count(), 1);
    }

    #[test]
    fn identifier_is_padded() {
        assert_eq!(archive().identifier(), "000026");
        assert_eq!(archive().version_id(), None);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let manifest = serde_json::json!({
            "dandiset_id": "000026",
            "version_id": "0.230101.0000",
            "assets": [
                {"path": "sub-01/a.h5", "download_url": "https://api/a", "size": 12},
                {"path": "sub-01/a.json"}
            ]
        });
        write!(file, "{manifest}").unwrap();

        let archive = ManifestArchive::load(file.path()).unwrap();
        assert_eq!(archive.version_id(), Some("0.230101.0000"));
        let asset = archive.get_asset_by_path("sub-01/a.json").unwrap();
        assert_eq!(asset.download_url, "");
        assert_eq!(asset.size, None);
        assert_eq!(archive.get_asset_by_path("sub-01/a.h5").unwrap().size, Some(12));
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            ManifestArchive::load(file.path()),
            Err(SessionError::ManifestFormat { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ManifestArchive::load(&dir.path().join("missing.json")),
            Err(SessionError::ManifestIo { .. })
        ));
    }

    #[test]
    fn client_checks_id_and_version() {
        let client = ManifestClient::new(Manifest {
            dandiset_id: "000026".into(),
            version_id: Some("draft".into()),
            assets: vec![],
        });
        assert!(client.get_dandiset(&DandisetId::from(26u32), None).is_ok());
        assert!(client.get_dandiset(&DandisetId::from(26u32), Some("draft")).is_ok());
        assert!(matches!(
            client.get_dandiset(&DandisetId::from(26u32), Some("0.1")),
            Err(SessionError::UnknownDandiset(l)) if l == "000026@0.1"
        ));
        assert!(matches!(
            client.get_dandiset(&DandisetId::from(27u32), None),
            Err(SessionError::UnknownDandiset(_))
        ));
    }
}
