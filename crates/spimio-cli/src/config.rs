//! Configuration for the spimio CLI.
//!
//! Configuration is loaded from `~/.config/spimio/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Asset listing to browse when `--manifest` is not given.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// DANDI API root used with `--dandiset`.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_api_url() -> String {
    spimio_dandi::DEFAULT_API_URL.to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            api_url: default_api_url(),
            log_filter: default_log_filter(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults when it doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "spimio").context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.manifest, None);
        assert_eq!(config.api_url, "https://api.dandiarchive.org/api");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
manifest = "/data/000026.json"
api_url = "https://api-staging.dandiarchive.org/api"
log_filter = "spimio_dandi=trace"
"#;
        let config: CliConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.manifest, Some(PathBuf::from("/data/000026.json")));
        assert_eq!(config.api_url, "https://api-staging.dandiarchive.org/api");
        assert_eq!(config.log_filter, "spimio_dandi=trace");
    }

    #[test]
    fn test_parse_empty_config() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_filter = \"debug\"\n").unwrap();

        let config = CliConfig::load_from(&path).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.manifest, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "manifest = [").unwrap();

        let err = CliConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_config_path_name() {
        if let Ok(path) = CliConfig::config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
