//! A dandiset exposed as a directory tree.
//!
//! The archive stores assets under full paths and answers prefix queries;
//! it has no directories. [`Dandiset`] turns those queries into the
//! [`Backend`] primitives, so a [`DandiPath`] can be listed and globbed.
//!
//! Prefix queries are string matches (`sub-01` also returns `sub-010/...`).
//! Every result is re-parsed and compared on segments before it counts.

use std::sync::Arc;

use spimio_vfs::{Backend, DirEntry, PurePath, RemotePath, VfsError};
use tracing::trace;

use crate::error::{DandiError, SessionError};
use crate::session::{ArchiveClient, ArchiveSession, Asset, DandisetId};
use crate::transport::{Transport, strip_query};

/// A path inside a dandiset.
pub type DandiPath = RemotePath<Dandiset>;

/// One dandiset (at one version) seen as a filesystem.
///
/// Holds no state besides the session. Nothing is cached: every question
/// is a fresh round trip.
pub struct Dandiset {
    session: Box<dyn ArchiveSession>,
}

impl Dandiset {
    pub fn new(session: impl ArchiveSession + 'static) -> Self {
        Self {
            session: Box::new(session),
        }
    }

    pub fn from_session(session: Box<dyn ArchiveSession>) -> Self {
        Self { session }
    }

    /// Open a dandiset through a client.
    pub fn open(
        client: &dyn ArchiveClient,
        id: impl Into<DandisetId>,
        version: Option<&str>,
    ) -> Result<Arc<Self>, SessionError> {
        let session = client.get_dandiset(&id.into(), version)?;
        Ok(Arc::new(Self::from_session(session)))
    }

    pub fn identifier(&self) -> &str {
        self.session.identifier()
    }

    pub fn version_id(&self) -> Option<&str> {
        self.session.version_id()
    }

    pub fn session(&self) -> &dyn ArchiveSession {
        self.session.as_ref()
    }

    /// A path bound to this dandiset.
    pub fn path(self: &Arc<Self>, path: &str) -> DandiPath {
        RemotePath::with_remote(path, Arc::clone(self))
    }

    /// The dandiset root.
    pub fn root(self: &Arc<Self>) -> DandiPath {
        self.path("")
    }

    /// Assets whose parsed path is `key` or lies below it.
    fn assets_under(&self, key: &PurePath) -> Result<Vec<PurePath>, VfsError> {
        let prefix = query_key(key);
        let assets = self.session.get_assets_with_path_prefix(&prefix)?;
        trace!(
            dandiset = self.identifier(),
            prefix = %prefix,
            results = assets.len(),
            "prefix query"
        );
        Ok(assets
            .iter()
            .map(|a| PurePath::new(&a.path).strip_root())
            .filter(|p| p.is_relative_to(key))
            .collect())
    }

    fn lookup(&self, path: &PurePath) -> Result<Asset, SessionError> {
        let key = query_key(path);
        let asset = self.session.get_asset_by_path(&key);
        trace!(
            dandiset = self.identifier(),
            path = %key,
            found = asset.is_ok(),
            "point lookup"
        );
        asset
    }
}

impl std::fmt::Debug for Dandiset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dandiset")
            .field("identifier", &self.identifier())
            .field("version_id", &self.version_id())
            .finish()
    }
}

/// Archive-side name of a path: segments joined with `/`, root ignored.
fn query_key(path: &PurePath) -> String {
    path.strip_root().segments().join("/")
}

impl Backend for Dandiset {
    fn exists(&self, path: &PurePath) -> Result<bool, VfsError> {
        // Exact match or strict descendant, both pass the filter
        Ok(!self.assets_under(&path.strip_root())?.is_empty())
    }

    fn is_dir(&self, path: &PurePath) -> Result<bool, VfsError> {
        let key = path.strip_root();
        Ok(self
            .assets_under(&key)?
            .iter()
            .any(|p| p.is_descendant_of(&key)))
    }

    fn is_file(&self, path: &PurePath) -> Result<bool, VfsError> {
        match self.lookup(path) {
            Ok(_) => Ok(true),
            Err(SessionError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_children(&self, path: &PurePath) -> Result<Vec<DirEntry>, VfsError> {
        let key = path.strip_root();
        let below: Vec<PurePath> = self
            .assets_under(&key)?
            .into_iter()
            .filter(|p| p.is_descendant_of(&key))
            .collect();
        if below.is_empty() {
            return Err(VfsError::NotADirectory(path.to_string()));
        }

        let depth = key.segments().len();
        let mut entries = Vec::new();
        let mut subdirs: Vec<&str> = Vec::new();
        for asset in &below {
            let name = asset.segments()[depth].as_str();
            if asset.segments().len() == depth + 1 {
                entries.push(DirEntry::file(path.child(name)));
            } else if !subdirs.contains(&name) {
                subdirs.push(name);
                entries.push(DirEntry::directory(path.child(name)));
            }
        }
        Ok(entries)
    }
}

/// Archive-specific operations on [`DandiPath`].
pub trait DandiPathExt {
    /// The attached dandiset, or [`DandiError::MissingDandiset`].
    fn dandiset(&self) -> Result<&Arc<Dandiset>, DandiError>;

    fn dandiset_id(&self) -> Option<&str>;

    fn version_id(&self) -> Option<&str>;

    /// `dandi://dandiset/<id>/[<version>/]<path>`
    fn as_uri(&self) -> Result<String, DandiError>;

    /// The asset record of a file.
    fn as_asset(&self) -> Result<Asset, DandiError>;

    fn download_url(&self) -> Result<String, DandiError>;

    /// Where the download URL redirects to, without its signature.
    fn s3_url(&self, transport: &dyn Transport) -> Result<String, DandiError>;
}

impl DandiPathExt for DandiPath {
    fn dandiset(&self) -> Result<&Arc<Dandiset>, DandiError> {
        self.remote().ok_or(DandiError::MissingDandiset)
    }

    fn dandiset_id(&self) -> Option<&str> {
        self.remote().map(|d| d.identifier())
    }

    fn version_id(&self) -> Option<&str> {
        self.remote().and_then(|d| d.version_id())
    }

    fn as_uri(&self) -> Result<String, DandiError> {
        let dandiset = self.dandiset()?;
        let path = query_key(self.as_pure());
        Ok(match dandiset.version_id() {
            Some(version) if !version.is_empty() => {
                format!("dandi://dandiset/{}/{version}/{path}", dandiset.identifier())
            }
            _ => format!("dandi://dandiset/{}/{path}", dandiset.identifier()),
        })
    }

    fn as_asset(&self) -> Result<Asset, DandiError> {
        let dandiset = self.dandiset()?;
        if !dandiset.is_file(self.as_pure())? {
            return Err(DandiError::NotAFile(self.to_string()));
        }
        Ok(dandiset.lookup(self.as_pure())?)
    }

    fn download_url(&self) -> Result<String, DandiError> {
        Ok(self.as_asset()?.download_url)
    }

    fn s3_url(&self, transport: &dyn Transport) -> Result<String, DandiError> {
        let resolved = transport.resolve(&self.download_url()?)?;
        Ok(strip_query(&resolved).to_string())
    }
}
