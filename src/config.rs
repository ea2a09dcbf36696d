//! Application configuration with persistence.
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/lazyaptos/config.json`
//! - macOS: `~/Library/Application Support/lazyaptos/config.json`
//! - Windows: `%APPDATA%/lazyaptos/config.json`
//!
//! Missing fields take their defaults, so a partial file is valid.

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::HttpConfig;
use crate::domain::Network;
use crate::search::aggregate::{LONG_TTL, SHORT_TTL, TtlPolicy};
use crate::search::cache::ResultCache;
use crate::search::coordinator::DEFAULT_DEBOUNCE;
use crate::search::probes::DEFAULT_OWNED_OBJECTS_LIMIT;

// ============================================================================
// Constants
// ============================================================================

/// Application name used for configuration directory.
const APP_NAME: &str = "lazyaptos";

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

// ============================================================================
// AppConfig
// ============================================================================

/// Persisted settings for the search resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub network: Network,
    /// Quiet period before a typed query is resolved.
    pub debounce_ms: u64,
    /// TTL for result sets made only of transactions and blocks.
    pub long_ttl_secs: u64,
    pub short_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Maximum rows returned by the owned-objects fallback.
    pub owned_objects_limit: usize,
    pub cache_enabled: bool,
    /// Overrides the network's fullnode REST URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_url: Option<String>,
    /// Overrides the network's indexer GraphQL URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexer_url: Option<String>,
    /// Bearer token sent to the fullnode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(500),
            long_ttl_secs: LONG_TTL.as_secs(),
            short_ttl_secs: SHORT_TTL.as_secs(),
            request_timeout_secs: crate::client::http::DEFAULT_TIMEOUT_SECS,
            owned_objects_limit: DEFAULT_OWNED_OBJECTS_LIMIT,
            cache_enabled: true,
            node_url: None,
            indexer_url: None,
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Returns the path to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "Could not determine config directory. Expected XDG_CONFIG_HOME or ~/.config on Linux, ~/Library/Application Support on macOS, %APPDATA% on Windows"
            )
        })?;
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    /// Loads the configuration, falling back to defaults on any failure.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!("Config load failed, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Saves the configuration to its default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined or written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Writes the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    // ========================================================================
    // Derived Settings
    // ========================================================================

    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn ttl_policy(&self) -> TtlPolicy {
        TtlPolicy {
            long: Duration::from_secs(self.long_ttl_secs),
            short: Duration::from_secs(self.short_ttl_secs),
        }
    }

    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            api_key: self.api_key.clone(),
            ..HttpConfig::with_timeout(Duration::from_secs(self.request_timeout_secs))
        }
    }

    #[must_use]
    pub fn result_cache(&self) -> ResultCache {
        if self.cache_enabled {
            ResultCache::session()
        } else {
            ResultCache::disabled()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lazyaptos-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.ttl_policy(), TtlPolicy::default());
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"network": "testnet", "debounce_ms": 250}"#).unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(config.owned_objects_limit, DEFAULT_OWNED_OBJECTS_LIMIT);
        assert_eq!(config.node_url, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_config_path("round-trip");
        let config = AppConfig {
            network: Network::Devnet,
            cache_enabled: false,
            node_url: Some("http://127.0.0.1:8080/v1".to_string()),
            ..AppConfig::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_load_from_rejects_garbage() {
        let path = temp_config_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(AppConfig::load_from(&path).is_err());

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_http_config_carries_timeout_and_key() {
        let config = AppConfig {
            request_timeout_secs: 3,
            api_key: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let http = config.http_config();
        assert_eq!(http.timeout, Duration::from_secs(3));
        assert_eq!(http.api_key.as_deref(), Some("secret"));
    }
}
