//! Configuration management for docwatch.
//!
//! Settings live in a TOML file under the user config directory. The API
//! base URL resolves in precedence order: value persisted in the settings
//! file, then the `DOCWATCH_API_URL` environment variable, then the
//! built-in local-development default.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Built-in API base URL used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable consulted when the settings file has no `api_url`.
pub const API_URL_ENV: &str = "DOCWATCH_API_URL";

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Process-wide guard so the default-URL warning is emitted at most once.
/// Init-once semantics: the first resolution that falls back to the built-in
/// default logs a warning; every later fallback is silent.
static DEFAULT_URL_WARNED: AtomicBool = AtomicBool::new(false);

/// Persisted settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API base URL persisted by `docw config set api_url ...`.
    /// None means "resolve from environment".
    pub api_url: Option<String>,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// Poll interval in seconds for watch loops and the dashboard.
    pub poll_interval_secs: u64,
    /// Confidence threshold below which classification items need review.
    pub review_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout: 30,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            review_threshold: 0.8,
        }
    }
}

impl Settings {
    /// Resolve the effective API base URL.
    pub fn resolved_api_url(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.trim_end_matches('/').to_string();
        }
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                return url.trim_end_matches('/').to_string();
            }
        }
        if !DEFAULT_URL_WARNED.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "no API URL configured; falling back to {} (set {} or run `docw config set api_url <url>`)",
                DEFAULT_API_URL,
                API_URL_ENV
            );
        }
        DEFAULT_API_URL.to_string()
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs.max(1))
    }

    /// Load settings from the given file, or defaults when it is absent.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let settings = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid settings file {}: {}", path.display(), e))?;
        Ok(settings)
    }

    /// Persist settings to the given file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

/// Default settings file location: `<config dir>/docwatch/docwatch.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docwatch")
        .join("docwatch.toml")
}

/// Load settings honoring an optional explicit path override.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<(Settings, PathBuf)> {
    let path = config_path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);
    let settings = Settings::load_from(&path)?;
    Ok((settings, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, None);
        assert_eq!(settings.request_timeout, 30);
        assert_eq!(settings.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_persisted_url_wins() {
        let settings = Settings {
            api_url: Some("https://pipeline.example.com/".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_api_url(), "https://pipeline.example.com");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.api_url, None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("docwatch.toml");
        let settings = Settings {
            api_url: Some("http://10.0.0.5:8000".to_string()),
            request_timeout: 10,
            poll_interval_secs: 5,
            review_threshold: 0.6,
        };
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(loaded.request_timeout, 10);
        assert_eq!(loaded.poll_interval_secs, 5);
    }

    #[test]
    fn test_load_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docwatch.toml");
        std::fs::write(&path, "api_url = [not toml").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }

    #[test]
    fn test_poll_interval_floor() {
        let settings = Settings {
            poll_interval_secs: 0,
            ..Settings::default()
        };
        assert_eq!(settings.poll_interval(), std::time::Duration::from_secs(1));
    }
}
