//! Configuration management for shelf.
//!
//! Loads configuration from ${SHELF_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the embedded default config template.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for shelf configuration and data directories.
    //!
    //! SHELF_HOME resolution order:
    //! 1. SHELF_HOME environment variable (if set)
    //! 2. ~/.config/shelf (default)

    use std::path::PathBuf;

    /// Returns the shelf home directory.
    ///
    /// Checks SHELF_HOME env var first, falls back to ~/.config/shelf
    pub fn shelf_home() -> PathBuf {
        if let Ok(home) = std::env::var("SHELF_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("shelf")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        shelf_home().join("config.toml")
    }

    /// Returns the path to the persistent storage tier.
    pub fn storage_path() -> PathBuf {
        shelf_home().join("storage.json")
    }

    /// Returns the directory holding log files.
    pub fn logs_dir() -> PathBuf {
        shelf_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog/auth API
    pub api_base_url: String,
    /// Products per page
    pub page_size: u32,
    /// Quiet window before a search keystroke becomes a fetch
    pub search_debounce_ms: u64,
    /// Cached pages older than this are refetched in the background (0 = always)
    pub stale_after_secs: u64,
    /// Cached pages not viewed for this long are dropped
    pub cache_gc_secs: u64,
    /// Per-request timeout; there is no automatic retry
    pub request_timeout_secs: u64,
    /// Lifetime requested for newly issued access tokens
    pub token_expires_in_mins: u32,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://dummyjson.com";
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
    pub const DEFAULT_CACHE_GC_SECS: u64 = 300;
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_TOKEN_EXPIRES_IN_MINS: u32 = 30;

    /// Env var overriding `api_base_url`.
    pub const API_BASE_URL_ENV: &'static str = "SHELF_API_BASE_URL";

    /// Loads configuration from the default path.
    /// Returns defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var(Self::API_BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url;
        }

        Ok(config)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    pub fn cache_gc(&self) -> Duration {
        Duration::from_secs(self.cache_gc_secs)
    }

    /// Page size, never zero.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    /// Creates a new config file with the commented default template.
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            search_debounce_ms: Self::DEFAULT_SEARCH_DEBOUNCE_MS,
            stale_after_secs: 0,
            cache_gc_secs: Self::DEFAULT_CACHE_GC_SECS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            token_expires_in_mins: Self::DEFAULT_TOKEN_EXPIRES_IN_MINS,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.token_expires_in_mins, 30);
        assert_eq!(config.cache_gc(), Duration::from_secs(300));
    }

    /// Partial config merges with defaults.
    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "page_size = 50\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce_ms, 300);
    }

    /// Malformed file is an error, not silently defaulted.
    #[test]
    fn test_load_malformed_config_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "page_size = \"many\"\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    /// Init creates the template and parent dirs; the template parses back to defaults.
    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# api_base_url ="));

        let config: Config = toml::from_str(&contents).unwrap();
        assert_eq!(config.page_size, Config::DEFAULT_PAGE_SIZE);
    }

    /// Init fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = Config {
            api_base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let config = Config {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(config.effective_page_size(), 20);
    }
}
