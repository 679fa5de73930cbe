//! Paths a chunk can be read from.

use std::path::PathBuf;
use std::sync::Arc;

use spimio_dandi::{DandiPath, DandiPathExt, Transport};
use spimio_vfs::{LocalBackend, RemotePath};

use crate::error::InfoError;
use crate::stream::JsonSource;
use crate::volume::VolumeLocation;

/// A file or directory that metadata can be gathered from.
///
/// Implemented for local paths and for [`DandiPath`], so chunk and slab
/// inspection runs the same on a local copy and on the archive.
pub trait ChunkSource: Clone + Sized {
    /// Final component, `""` when there is none.
    fn file_name(&self) -> &str;

    /// Path with the final component replaced.
    fn sibling(&self, name: &str) -> Result<Self, InfoError>;

    fn exists(&self) -> Result<bool, InfoError>;

    fn is_dir(&self) -> Result<bool, InfoError>;

    /// Matches of a relative pattern below this directory.
    fn glob(&self, pattern: &str) -> Result<Vec<Self>, InfoError>;

    fn json_source(&self) -> Result<JsonSource, InfoError>;

    fn volume_location(&self, transport: Option<&dyn Transport>)
    -> Result<VolumeLocation, InfoError>;

    /// For messages.
    fn describe(&self) -> String;
}

impl ChunkSource for PathBuf {
    fn file_name(&self) -> &str {
        self.as_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    fn sibling(&self, name: &str) -> Result<Self, InfoError> {
        Ok(self.with_file_name(name))
    }

    fn exists(&self) -> Result<bool, InfoError> {
        Ok(self.as_path().exists())
    }

    fn is_dir(&self) -> Result<bool, InfoError> {
        Ok(self.as_path().is_dir())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<Self>, InfoError> {
        let root = RemotePath::with_remote("", Arc::new(LocalBackend::new(self.clone())));
        Ok(root
            .glob(pattern)?
            .into_iter()
            .map(|found| {
                let mut path = self.clone();
                path.extend(found.segments());
                path
            })
            .collect())
    }

    fn json_source(&self) -> Result<JsonSource, InfoError> {
        Ok(JsonSource::Local(self.clone()))
    }

    fn volume_location(
        &self,
        _transport: Option<&dyn Transport>,
    ) -> Result<VolumeLocation, InfoError> {
        Ok(VolumeLocation::Local(self.clone()))
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl ChunkSource for DandiPath {
    fn file_name(&self) -> &str {
        self.name()
    }

    fn sibling(&self, name: &str) -> Result<Self, InfoError> {
        Ok(self.with_name(name).map_err(spimio_vfs::VfsError::from)?)
    }

    fn exists(&self) -> Result<bool, InfoError> {
        Ok(RemotePath::exists(self)?)
    }

    fn is_dir(&self) -> Result<bool, InfoError> {
        Ok(RemotePath::is_dir(self)?)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<Self>, InfoError> {
        Ok(RemotePath::glob(self, pattern)?)
    }

    fn json_source(&self) -> Result<JsonSource, InfoError> {
        Ok(JsonSource::Url(self.download_url()?))
    }

    /// Object-store URL, resolved through `transport`.
    fn volume_location(
        &self,
        transport: Option<&dyn Transport>,
    ) -> Result<VolumeLocation, InfoError> {
        let transport = transport.ok_or_else(|| InfoError::NoTransport(self.to_string()))?;
        Ok(VolumeLocation::Remote(self.s3_url(transport)?))
    }

    fn describe(&self) -> String {
        match self.as_uri() {
            Ok(uri) => uri,
            Err(_) => self.to_string(),
        }
    }
}
