//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ListingSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listing page location and scraping selectors
    #[serde(default)]
    pub listing: ListingConfig,

    /// HTTP client settings for the page fetch
    #[serde(default)]
    pub http: HttpConfig,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// State and lock file locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Delivery ordering and bookkeeping
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Log level and destination
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return defaults if loading fails.
    ///
    /// A missing file quietly yields the defaults. Any other failure is
    /// returned next to the defaults so the caller can report it once
    /// logging is set up.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<AppError>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.listing.url)
            .map_err(|e| AppError::validation(format!("listing.url is invalid: {e}")))?;
        Url::parse(&self.telegram.api_base)
            .map_err(|e| AppError::validation(format!("telegram.api_base is invalid: {e}")))?;
        self.listing.selectors.compile()?;

        if self.listing.selectors.attr_name.trim().is_empty() {
            return Err(AppError::validation("listing.attr_name is empty"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.telegram.timeout_secs == 0 {
            return Err(AppError::validation("telegram.timeout_secs must be > 0"));
        }
        if self.storage.processed_file.as_os_str().is_empty() {
            return Err(AppError::validation("storage.processed_file is empty"));
        }
        Ok(())
    }
}

/// Listing page to poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Absolute URL of the listing page
    #[serde(default = "defaults::listing_url")]
    pub url: String,

    #[serde(flatten)]
    pub selectors: ListingSelectors,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: defaults::listing_url(),
            selectors: ListingSelectors::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Telegram Bot API settings. Credentials come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Locations of the persisted state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding every forwarded article
    #[serde(default = "defaults::processed_file")]
    pub processed_file: PathBuf,

    /// Lock file guarding against overlapping runs
    #[serde(default)]
    pub lock_file: Option<PathBuf>,
}

impl StorageConfig {
    /// Lock file path, defaulting to the state file with a `.lock` extension.
    pub fn lock_path(&self) -> PathBuf {
        self.lock_file
            .clone()
            .unwrap_or_else(|| self.processed_file.with_extension("lock"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            processed_file: defaults::processed_file(),
            lock_file: None,
        }
    }
}

/// When an article counts as processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Mark seen only after the message was accepted; failures retry next run
    #[default]
    AtLeastOnce,
    /// Mark seen after any send attempt; failures are never retried
    AtMostOnce,
}

/// How new articles are ordered before delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOrdering {
    /// Parse display times into timestamps, falling back to text order
    #[default]
    Chronological,
    /// Compare display times as plain strings
    Lexicographic,
}

/// Delivery settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub policy: DeliveryPolicy,

    #[serde(default)]
    pub ordering: TimeOrdering,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Append-only log file; stderr when unset
    #[serde(default = "defaults::log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            file: defaults::log_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn listing_url() -> String {
        "https://absolute-rating.mirtesen.ru/?page=1".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; newsrelay/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn processed_file() -> PathBuf {
        PathBuf::from("processed_news.json")
    }
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn log_file() -> Option<PathBuf> {
        Some(PathBuf::from("parser.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.http.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.telegram.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_relative_listing_url() {
        let mut config = Config::default();
        config.listing.url = "/?page=1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.listing.url, "https://absolute-rating.mirtesen.ru/?page=1");
        assert_eq!(config.listing.selectors, ListingSelectors::default());
        assert_eq!(config.delivery.policy, DeliveryPolicy::AtLeastOnce);
        assert_eq!(config.delivery.ordering, TimeOrdering::Chronological);
        assert_eq!(config.logging.file, Some(PathBuf::from("parser.log")));
    }

    #[test]
    fn toml_overrides_sections() {
        let config: Config = toml::from_str(
            r#"
            [listing]
            url = "https://news.example.com/latest"
            card_selector = "div.item"

            [delivery]
            policy = "at_most_once"
            ordering = "lexicographic"

            [storage]
            processed_file = "state/seen.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listing.url, "https://news.example.com/latest");
        assert_eq!(config.listing.selectors.card_selector, "div.item");
        assert_eq!(config.listing.selectors.link_selector, "a.post-card__pubdate");
        assert_eq!(config.delivery.policy, DeliveryPolicy::AtMostOnce);
        assert_eq!(config.delivery.ordering, TimeOrdering::Lexicographic);
        assert_eq!(config.storage.lock_path(), PathBuf::from("state/seen.lock"));
    }

    #[test]
    fn example_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../../config.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.listing.selectors, ListingSelectors::default());
        assert_eq!(config.delivery, DeliveryConfig::default());
        assert_eq!(config.storage.lock_path(), PathBuf::from("processed_news.lock"));
    }

    #[test]
    fn load_or_default_missing_file_uses_defaults() {
        let (config, failure) = Config::load_or_default("/nonexistent/newsrelay/config.toml");
        assert!(failure.is_none());
        assert_eq!(config.listing.url, defaults::listing_url());
    }

    #[test]
    fn load_or_default_broken_file_falls_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[listing\nurl = 1").unwrap();

        let (config, failure) = Config::load_or_default(&path);
        assert!(matches!(failure, Some(AppError::Toml(_))));
        assert_eq!(config.listing.url, defaults::listing_url());
        assert_eq!(config.delivery, DeliveryConfig::default());
    }

    #[test]
    fn load_or_default_reads_valid_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[delivery]\npolicy = \"at_most_once\"\n").unwrap();

        let (config, failure) = Config::load_or_default(&path);
        assert!(failure.is_none());
        assert_eq!(config.delivery.policy, DeliveryPolicy::AtMostOnce);
    }

    #[test]
    fn load_rejects_broken_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[listing\nurl = 1").unwrap();
        assert!(matches!(Config::load(&path), Err(AppError::Toml(_))));
    }

    #[test]
    fn load_rejects_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/newsrelay/config.toml"),
            Err(AppError::Io(_))
        ));
    }
}
