//! Blocking HTTP transport.

use std::io::Read;
use std::time::Duration;

use tracing::trace;
use url::Url;

use crate::error::SessionError;
use crate::transport::Transport;

const USER_AGENT: &str = concat!("spimio/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(60);

/// [`Transport`] over HTTP(S).
///
/// `resolve` sends a `HEAD` without following redirects: a 3xx answer
/// yields its `Location` (joined onto the request URL when relative), any
/// other success yields the URL unchanged. `fetch` follows redirects.
///
/// Status codes map onto [`SessionError`]: 404 is `NotFound`, 401 and 403
/// are `PermissionDenied`, everything else is `Transport`.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
    head: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build();
        let head = ureq::AgentBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .redirects(0)
            .build();
        Self { agent, head }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl Transport for HttpTransport {
    fn resolve(&self, url: &str) -> Result<String, SessionError> {
        let response = self.head.head(url).call().map_err(|e| call_error(e, url))?;
        if !(300..400).contains(&response.status()) {
            return Ok(url.to_string());
        }

        let location = response.header("location").ok_or_else(|| {
            SessionError::Transport(format!("{url}: redirect without a Location header"))
        })?;
        let base = Url::parse(url).map_err(|source| SessionError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        let target = base.join(location).map_err(|source| SessionError::InvalidUrl {
            url: location.to_string(),
            source,
        })?;
        trace!(%url, %target, "resolved redirect");
        Ok(target.into())
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, SessionError> {
        let response = self.agent.get(url).call().map_err(|e| call_error(e, url))?;
        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| SessionError::Transport(format!("{url}: {e}")))?;
        trace!(%url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

fn call_error(err: ureq::Error, url: &str) -> SessionError {
    match err {
        ureq::Error::Status(404, _) => SessionError::NotFound(url.to_string()),
        ureq::Error::Status(401 | 403, _) => SessionError::PermissionDenied(url.to_string()),
        ureq::Error::Status(code, _) => SessionError::Transport(format!("{url}: HTTP {code}")),
        other => SessionError::Transport(format!("{url}: {other}")),
    }
}
