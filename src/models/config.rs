//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and politeness settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Source site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Season shape settings
    #[serde(default)]
    pub season: SeasonConfig,

    /// Output layout settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.season.weeks == Some(0) {
            return Err(AppError::validation("season.weeks must be > 0"));
        }
        if url::Url::parse(&self.site.base_url).is_err() {
            return Err(AppError::validation(format!(
                "site.base_url is not a valid URL: {}",
                self.site.base_url
            )));
        }
        Ok(())
    }
}

/// HTTP client and politeness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Minimum delay between the starts of consecutive requests
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Retries after the first attempt on 429, 5xx and transport errors
    #[serde(default = "defaults::max_retries")]
    pub max_retries: u32,

    /// Upper bound for a single backoff wait
    #[serde(default = "defaults::max_backoff")]
    pub max_backoff_ms: u64,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_retries: defaults::max_retries(),
            max_backoff_ms: defaults::max_backoff(),
        }
    }
}

/// Source site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
        }
    }
}

/// Season shape settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Fixed regular-season length; derived from the season page when unset
    #[serde(default)]
    pub weeks: Option<u32>,
}

/// Output layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write one file per box score instead of one per week
    #[serde(default)]
    pub split_by_game: bool,

    /// Emit the optional advanced-stat tables
    #[serde(default = "defaults::include_advanced")]
    pub include_advanced: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            split_by_game: false,
            include_advanced: defaults::include_advanced(),
        }
    }
}

mod defaults {
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; pfr-scrape/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    // The site bans clients that exceed roughly 20 requests per minute.
    pub fn request_delay() -> u64 {
        3000
    }
    pub fn max_retries() -> u32 {
        3
    }
    pub fn max_backoff() -> u64 {
        60_000
    }
    pub fn base_url() -> String {
        "https://www.pro-football-reference.com".into()
    }
    pub fn include_advanced() -> bool {
        true
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
        config.crawler.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_weeks() {
        let mut config = Config::default();
        config.season.weeks = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.site.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            request_delay_ms = 500

            [season]
            weeks = 17
            "#,
        )
        .unwrap();
        assert_eq!(config.crawler.request_delay_ms, 500);
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.season.weeks, Some(17));
        assert!(config.output.include_advanced);
        assert!(!config.output.split_by_game);
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = Config::load_or_default("/definitely/not/here.toml");
        assert_eq!(config.crawler.request_delay_ms, 3000);
    }
}
