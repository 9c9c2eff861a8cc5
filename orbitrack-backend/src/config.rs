use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::module::tracking::{DEFAULT_RECORD_LIMIT, SourceGroup, default_source_groups};

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,

    /// Catalog age after which the next query re-ingests
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,

    /// Per-request timeout for element-set fetches
    #[serde(default = "default_fetch_timeout_seconds")]
    pub fetch_timeout_seconds: u64,

    /// Maximum number of catalog records accepted per ingestion
    #[serde(default = "default_record_limit")]
    pub record_limit: usize,

    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Source groups in priority order
    #[serde(default = "default_source_groups")]
    pub source_groups: Vec<SourceGroup>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_retention_days() -> u64 {
    3
}

fn default_refresh_interval_seconds() -> u64 {
    86_400
}

fn default_fetch_timeout_seconds() -> u64 {
    15
}

fn default_record_limit() -> usize {
    DEFAULT_RECORD_LIMIT
}

fn default_enable_cors() -> bool {
    true
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_retention_days: default_log_retention_days(),
            refresh_interval_seconds: default_refresh_interval_seconds(),
            fetch_timeout_seconds: default_fetch_timeout_seconds(),
            record_limit: default_record_limit(),
            enable_cors: default_enable_cors(),
            source_groups: default_source_groups(),
        }
    }
}

impl TrackerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: TrackerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        Ok(config)
    }

    /// Read `path`, falling back to defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("Config file '{}' not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Saturates at `TimeDelta::MAX` for values chrono cannot represent
    pub fn refresh_interval(&self) -> chrono::Duration {
        i64::try_from(self.refresh_interval_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn log_retention(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.log_retention_days.saturating_mul(60 * 60 * 24))
    }
}

pub static CONFIG: OnceLock<TrackerConfig> = OnceLock::new();

/// Load the config once and publish it through [`CONFIG`]
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<&'static TrackerConfig> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = TrackerConfig::load(path)?;
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.server_address(), "0.0.0.0:8080");
        assert_eq!(config.refresh_interval(), chrono::Duration::seconds(86_400));
        assert_eq!(config.fetch_timeout(), std::time::Duration::from_secs(15));
        assert_eq!(config.record_limit, 2000);
        assert_eq!(config.source_groups.len(), 3);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let config = TrackerConfig {
            refresh_interval_seconds: u64::MAX,
            log_retention_days: u64::MAX,
            ..TrackerConfig::default()
        };
        assert_eq!(config.refresh_interval(), chrono::Duration::MAX);
        assert_eq!(config.log_retention(), std::time::Duration::from_secs(u64::MAX));

        let config = TrackerConfig {
            refresh_interval_seconds: i64::MAX as u64 / 10,
            ..TrackerConfig::default()
        };
        assert_eq!(config.refresh_interval(), chrono::Duration::MAX);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port = 9000
log_level = "debug"

[[source_groups]]
name = "mirror"
urls = ["https://mirror.example.org/stations.txt"]
"#
        )
        .unwrap();

        let config = TrackerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.refresh_interval_seconds, 86_400);
        assert_eq!(config.source_groups.len(), 1);
        assert_eq!(config.source_groups[0].name, "mirror");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrackerConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(TrackerConfig::from_file(file.path()).is_err());
    }
}
