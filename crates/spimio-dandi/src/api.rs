//! Sessions over the DANDI REST API.
//!
//! Endpoints used, relative to the API root:
//!
//! - `dandisets/{id}/` picks the version when none is given: the most
//!   recent published one, else the draft.
//! - `dandisets/{id}/versions/{v}/` checks an explicit version exists.
//! - `dandisets/{id}/versions/{v}/assets/?path=P` lists assets under a
//!   path prefix, paginated through `next` links.
//! - `assets/{asset_id}/download/` is the download URL handed out; it
//!   redirects to the blob store.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::SessionError;
use crate::session::{ArchiveClient, ArchiveSession, Asset, DandisetId};
use crate::transport::Transport;

/// Public DANDI archive API root.
pub const DEFAULT_API_URL: &str = "https://api.dandiarchive.org/api";

const PAGE_SIZE: &str = "1000";

#[derive(Debug, Deserialize)]
struct DandisetRecord {
    #[serde(default)]
    most_recent_published_version: Option<VersionRecord>,
    #[serde(default)]
    draft_version: Option<VersionRecord>,
}

#[derive(Debug, Deserialize)]
struct VersionRecord {
    version: String,
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    results: Vec<AssetRecord>,
}

#[derive(Debug, Deserialize)]
struct AssetRecord {
    asset_id: String,
    path: String,
    #[serde(default)]
    size: Option<u64>,
}

fn get_json<T: DeserializeOwned>(transport: &dyn Transport, url: &str) -> Result<T, SessionError> {
    let body = transport.fetch(url)?;
    serde_json::from_slice(&body).map_err(|source| SessionError::Response {
        url: url.to_string(),
        source,
    })
}

/// Opens [`DandiApiSession`]s against one API root.
pub struct DandiApiClient {
    api_url: String,
    transport: Arc<dyn Transport>,
}

impl DandiApiClient {
    /// Client for the public archive.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, transport)
    }

    /// Client for another instance, e.g. the staging server.
    pub fn with_api_url(api_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { api_url, transport }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn latest_version(&self, id: &DandisetId) -> Result<String, SessionError> {
        let url = format!("{}/dandisets/{id}/", self.api_url);
        let record: DandisetRecord = match get_json(self.transport.as_ref(), &url) {
            Err(SessionError::NotFound(_)) => return Err(SessionError::UnknownDandiset(id.to_string())),
            other => other?,
        };
        record
            .most_recent_published_version
            .or(record.draft_version)
            .map(|v| v.version)
            .ok_or_else(|| SessionError::UnknownDandiset(id.to_string()))
    }

    fn check_version(&self, id: &DandisetId, version: &str) -> Result<(), SessionError> {
        let url = format!("{}/dandisets/{id}/versions/{version}/", self.api_url);
        match self.transport.fetch(&url) {
            Ok(_) => Ok(()),
            Err(SessionError::NotFound(_)) => Err(SessionError::UnknownDandiset(format!("{id}@{version}"))),
            Err(e) => Err(e),
        }
    }
}

impl ArchiveClient for DandiApiClient {
    fn get_dandiset(
        &self,
        id: &DandisetId,
        version: Option<&str>,
    ) -> Result<Box<dyn ArchiveSession>, SessionError> {
        let version = match version {
            Some(v) => {
                self.check_version(id, v)?;
                v.to_string()
            }
            None => self.latest_version(id)?,
        };
        debug!(dandiset = %id, %version, api = %self.api_url, "opened dandiset");
        Ok(Box::new(DandiApiSession {
            api_url: self.api_url.clone(),
            transport: Arc::clone(&self.transport),
            identifier: id.to_string(),
            version,
        }))
    }
}

/// One dandiset version on a DANDI API server.
pub struct DandiApiSession {
    api_url: String,
    transport: Arc<dyn Transport>,
    identifier: String,
    version: String,
}

impl DandiApiSession {
    fn assets_url(&self, prefix: &str) -> Result<String, SessionError> {
        let base = format!(
            "{}/dandisets/{}/versions/{}/assets/",
            self.api_url, self.identifier, self.version
        );
        Url::parse_with_params(&base, &[("path", prefix), ("page_size", PAGE_SIZE)])
            .map(String::from)
            .map_err(|source| SessionError::InvalidUrl { url: base, source })
    }

    fn download_url(&self, asset_id: &str) -> String {
        format!("{}/assets/{asset_id}/download/", self.api_url)
    }
}

impl ArchiveSession for DandiApiSession {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn version_id(&self) -> Option<&str> {
        Some(&self.version)
    }

    fn get_assets_with_path_prefix(&self, prefix: &str) -> Result<Vec<Asset>, SessionError> {
        let mut assets = Vec::new();
        let mut next = Some(self.assets_url(prefix)?);
        let mut pages = 0usize;
        while let Some(url) = next {
            let page: AssetPage = get_json(self.transport.as_ref(), &url)?;
            pages += 1;
            // The server matches case-insensitively.
            for record in page.results.into_iter().filter(|r| r.path.starts_with(prefix)) {
                assets.push(Asset {
                    download_url: self.download_url(&record.asset_id),
                    path: record.path,
                    size: record.size,
                });
            }
            next = page.next;
        }
        trace!(prefix, pages, assets = assets.len(), "listed assets");
        Ok(assets)
    }

    fn get_asset_by_path(&self, path: &str) -> Result<Asset, SessionError> {
        self.get_assets_with_path_prefix(path)?
            .into_iter()
            .find(|asset| asset.path == path)
            .ok_or_else(|| SessionError::NotFound(path.to_string()))
    }
}
