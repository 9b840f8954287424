//! Configuration loading and resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument or environment variable (supplied by the binary)
//! 2. TOML config file
//! 3. Compiled default
//!
//! The resolved [`ServiceConfig`] is built once at startup and handed to the
//! service; nothing below the binary reads the process environment.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENRICHER_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_REPOSITORY_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub enricher_url: Option<String>,
    pub enricher_timeout_ms: Option<u64>,
    pub repository_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub seed_groups: Vec<String>,
}

/// Highest-priority values, typically from clap (flags with `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
    pub enricher_url: Option<String>,
    pub enricher_timeout_ms: Option<u64>,
    pub repository_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}

/// Upper bounds on how long the service waits for its collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadlines {
    /// Bound on each catalog store read or write
    pub repository: Duration,
    /// Bound on each metadata enricher lookup
    pub enricher: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            repository: Duration::from_millis(DEFAULT_REPOSITORY_TIMEOUT_MS),
            enricher: Duration::from_millis(DEFAULT_ENRICHER_TIMEOUT_MS),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Base URL of the metadata enricher (no trailing `/info`)
    pub enricher_url: String,
    pub deadlines: Deadlines,
    pub log_level: String,
    /// Groups created at startup if missing
    pub seed_groups: Vec<String>,
}

impl ServiceConfig {
    /// Merge overrides, file values and compiled defaults
    ///
    /// Fails only when no enricher URL is available from any source, or a
    /// timeout resolves to zero.
    pub fn resolve(overrides: ConfigOverrides, file: TomlConfig) -> Result<Self> {
        let enricher_url = overrides
            .enricher_url
            .or(file.enricher_url)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "Metadata service URL not configured. Set --enricher-url, \
                     EXTERNAL_API_URL, or enricher_url in the config file"
                        .to_string(),
                )
            })?;

        let enricher_timeout_ms = overrides
            .enricher_timeout_ms
            .or(file.enricher_timeout_ms)
            .unwrap_or(DEFAULT_ENRICHER_TIMEOUT_MS);
        let repository_timeout_ms = overrides
            .repository_timeout_ms
            .or(file.repository_timeout_ms)
            .unwrap_or(DEFAULT_REPOSITORY_TIMEOUT_MS);

        if enricher_timeout_ms == 0 || repository_timeout_ms == 0 {
            return Err(Error::Config("Timeouts must be greater than zero".to_string()));
        }

        Ok(Self {
            host: overrides
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or(file.database_path)
                .unwrap_or_else(default_database_path),
            enricher_url,
            deadlines: Deadlines {
                repository: Duration::from_millis(repository_timeout_ms),
                enricher: Duration::from_millis(enricher_timeout_ms),
            },
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            seed_groups: file.seed_groups,
        })
    }

    /// `host:port` string for binding the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the TOML config file
///
/// A missing file is not an error: a warning is logged and defaults apply.
/// A file that exists but cannot be parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found: {} (using defaults)", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("songlib"))
        .unwrap_or_else(|| PathBuf::from("./songlib_data"))
        .join("songlib.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url() -> ConfigOverrides {
        ConfigOverrides {
            enricher_url: Some("http://localhost:9000/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_apply() {
        let config = ServiceConfig::resolve(with_url(), TomlConfig::default()).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.deadlines, Deadlines::default());
        assert!(config.database_path.ends_with("songlib.db"));
        assert!(config.seed_groups.is_empty());
    }

    #[test]
    fn test_trailing_slash_stripped_from_url() {
        let config = ServiceConfig::resolve(with_url(), TomlConfig::default()).unwrap();
        assert_eq!(config.enricher_url, "http://localhost:9000");
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = TomlConfig {
            port: Some(9999),
            log_level: Some("warn".to_string()),
            enricher_url: Some("http://file".to_string()),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            port: Some(7000),
            ..with_url()
        };

        let config = ServiceConfig::resolve(overrides, file).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.enricher_url, "http://localhost:9000");
    }

    #[test]
    fn test_missing_enricher_url_is_config_error() {
        let err = ServiceConfig::resolve(ConfigOverrides::default(), TomlConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let overrides = ConfigOverrides {
            enricher_timeout_ms: Some(0),
            ..with_url()
        };
        assert!(ServiceConfig::resolve(overrides, TomlConfig::default()).is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServiceConfig::resolve(with_url(), TomlConfig::default()).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
