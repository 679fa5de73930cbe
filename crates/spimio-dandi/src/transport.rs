//! Fetching asset content.

use crate::error::SessionError;

/// HTTP-ish access to asset URLs.
///
/// Kept separate from [`ArchiveSession`](crate::ArchiveSession): listing
/// and download usually go to different hosts.
pub trait Transport: Send + Sync {
    /// Follow redirects from `url` and return the final location.
    fn resolve(&self, url: &str) -> Result<String, SessionError>;

    /// Fetch the body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SessionError>;
}

/// Drop a signed URL's query string.
///
/// ```
/// use spimio_dandi::strip_query;
///
/// assert_eq!(strip_query("https://bucket/blobs/ab?X-Amz-Signature=1"), "https://bucket/blobs/ab");
/// assert_eq!(strip_query("https://bucket/blobs/ab"), "https://bucket/blobs/ab");
/// ```
pub fn strip_query(url: &str) -> &str {
    match url.split_once('?') {
        Some((base, _)) => base,
        None => url,
    }
}
