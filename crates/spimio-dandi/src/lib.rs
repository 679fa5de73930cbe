//! spimio-dandi: DANDI dandisets as browsable path trees.
//!
//! The archive is flat: every asset has a full path, and the API answers
//! "assets whose path starts with this string" and "the asset at exactly
//! this path". This crate adapts those two calls to the
//! [`Backend`](spimio_vfs::Backend) primitives, so [`DandiPath`] supports
//! the whole `spimio-vfs` path API (listing, `glob`, `rglob`) plus a few
//! archive-specific operations ([`DandiPathExt`]).
//!
//! Sessions are injected. [`ManifestArchive`] serves one from a JSON
//! listing; [`DandiApiClient`] opens them against the live REST API over
//! any [`Transport`], normally [`HttpTransport`].
//!
//! ```
//! use spimio_dandi::{Asset, Dandiset, DandiPathExt, ManifestArchive};
//! use std::sync::Arc;
//!
//! let archive = ManifestArchive::new(26u32, Some("draft"), vec![
//!     Asset::new("sub-01/ses-1/a.h5", "https://api/assets/1/download"),
//! ]);
//! let dandiset = Arc::new(Dandiset::new(archive));
//! let found = dandiset.root().glob("sub-01/*/*.h5").unwrap();
//! assert_eq!(found[0].as_uri().unwrap(), "dandi://dandiset/000026/draft/sub-01/ses-1/a.h5");
//! ```

mod api;
mod dandiset;
mod error;
mod http;
mod manifest;
mod session;
mod transport;

pub use api::{DEFAULT_API_URL, DandiApiClient, DandiApiSession};
pub use dandiset::{DandiPath, DandiPathExt, Dandiset};
pub use error::{DandiError, SessionError};
pub use http::HttpTransport;
pub use manifest::{Manifest, ManifestArchive, ManifestClient};
pub use session::{ArchiveClient, ArchiveSession, Asset, DandisetId};
pub use transport::{Transport, strip_query};
