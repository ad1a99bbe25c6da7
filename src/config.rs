//! Runtime configuration.
use crate::api::DEFAULT_API_URL;
use crate::gallery::ErrorDisplay;
use crate::stat_store::StatsNamespace;
use std::env;
use std::path::PathBuf;

/// Settings for the API client, storage and display policy.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub data_dir: Option<PathBuf>,
    pub error_display: ErrorDisplay,
    pub stats_namespace: StatsNamespace,
    pub storage_quota: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            error_display: ErrorDisplay::Status,
            stats_namespace: StatsNamespace::Current,
            storage_quota: None,
        }
    }
}

impl Config {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DIGIVAULT_API_URL` - Creature list endpoint (default: public API)
    /// - `DIGIVAULT_DATA_DIR` - Directory for `storage.json` (default: platform data dir)
    /// - `DIGIVAULT_STATUS_ON_ERROR` - Show fetch errors in the status line (default: true)
    /// - `DIGIVAULT_STATS_NAMESPACE` - `current` or `legacy` stats cache (default: current)
    /// - `DIGIVAULT_STORAGE_QUOTA` - Byte limit for stored values (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DIGIVAULT_API_URL") {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        config.data_dir = env::var("DIGIVAULT_DATA_DIR").ok().map(PathBuf::from);

        if let Some(show) = read_env::<bool>("DIGIVAULT_STATUS_ON_ERROR") {
            config.error_display = if show {
                ErrorDisplay::Status
            } else {
                ErrorDisplay::Silent
            };
        }

        if let Some(namespace) = read_env::<StatsNamespace>("DIGIVAULT_STATS_NAMESPACE") {
            config.stats_namespace = namespace;
        }

        config.storage_quota = read_env::<usize>("DIGIVAULT_STORAGE_QUOTA");

        config
    }

    /// Directory holding `storage.json`: the configured one, or the
    /// platform data directory, or the working directory as a last resort.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "digivault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.error_display, ErrorDisplay::Status);
        assert_eq!(config.stats_namespace, StatsNamespace::Current);
        assert!(config.storage_quota.is_none());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/digivault-test")),
            ..Config::default()
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/digivault-test"));
    }
}
