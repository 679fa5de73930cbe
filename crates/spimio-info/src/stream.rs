//! Loading JSON from wherever it lives.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;
use spimio_dandi::Transport;

use crate::error::InfoError;

/// Where a JSON document comes from.
pub enum JsonSource {
    Local(PathBuf),
    /// `http://` or `https://`, fetched through a [`Transport`].
    Url(String),
    Reader(Box<dyn Read>),
}

impl JsonSource {
    /// Classify a string: URLs by scheme, anything else is a local path.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            JsonSource::Url(s.to_string())
        } else {
            JsonSource::Local(PathBuf::from(s))
        }
    }
}

impl fmt::Display for JsonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSource::Local(path) => write!(f, "{}", path.display()),
            JsonSource::Url(url) => f.write_str(url),
            JsonSource::Reader(_) => f.write_str("<reader>"),
        }
    }
}

impl fmt::Debug for JsonSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSource::Local(path) => f.debug_tuple("Local").field(path).finish(),
            JsonSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
            JsonSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// Load and parse a JSON document.
///
/// URLs need a transport; local paths and readers do not.
pub fn load_json(source: JsonSource, transport: Option<&dyn Transport>) -> Result<Value, InfoError> {
    let location = source.to_string();
    let parsed = match source {
        JsonSource::Local(path) => {
            let text = std::fs::read_to_string(&path)
                .map_err(|source| InfoError::Io { path, source })?;
            serde_json::from_str(&text)
        }
        JsonSource::Url(url) => {
            let transport = transport.ok_or_else(|| InfoError::NoTransport(url.clone()))?;
            let body = transport.fetch(&url)?;
            serde_json::from_slice(&body)
        }
        JsonSource::Reader(reader) => serde_json::from_reader(reader),
    };
    tracing::trace!(%location, ok = parsed.is_ok(), "load json");
    parsed.map_err(|source| InfoError::Json { location, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spimio_dandi::SessionError;

    struct Served(&'static str);

    impl Transport for Served {
        fn resolve(&self, url: &str) -> Result<String, SessionError> {
            Ok(url.to_string())
        }

        fn fetch(&self, _url: &str) -> Result<Vec<u8>, SessionError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn classify() {
        assert!(matches!(JsonSource::parse("https://x/a.json"), JsonSource::Url(_)));
        assert!(matches!(JsonSource::parse("http://x/a.json"), JsonSource::Url(_)));
        assert!(matches!(JsonSource::parse("/data/a.json"), JsonSource::Local(_)));
        assert!(matches!(JsonSource::parse("ftp.json"), JsonSource::Local(_)));
    }

    #[test]
    fn from_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, r#"{"PixelSize": [1.0, 2.0, 3.0]}"#).unwrap();
        let value = load_json(JsonSource::Local(path), None).unwrap();
        assert_eq!(value["PixelSize"][1], 2.0);
    }

    #[test]
    fn from_reader() {
        let reader = std::io::Cursor::new(br#"[1, 2]"#.to_vec());
        let value = load_json(JsonSource::Reader(Box::new(reader)), None).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }

    #[test]
    fn url_needs_transport() {
        let source = JsonSource::parse("https://x/a.json");
        assert!(matches!(load_json(source, None), Err(InfoError::NoTransport(_))));

        let source = JsonSource::parse("https://x/a.json");
        let value = load_json(source, Some(&Served(r#"{"a": 1}"#))).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn bad_json_names_location() {
        let source = JsonSource::parse("https://x/a.json");
        let err = load_json(source, Some(&Served("nope"))).unwrap_err();
        assert!(matches!(err, InfoError::Json { location, .. } if location == "https://x/a.json"));
    }

    #[test]
    fn missing_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json(JsonSource::Local(dir.path().join("none.json")), None).unwrap_err();
        assert!(matches!(err, InfoError::Io { .. }));
    }
}
