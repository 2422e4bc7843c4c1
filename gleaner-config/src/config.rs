//! Configuration management.
//!
//! The file holds preferences only. Credentials stay in the environment;
//! each service names the variable its token is read from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gleaner_core::{ApiErrorKind, ServiceKind};
use gleaner_fetch::RetryConfig;
use gleaner_providers::CollectOptions;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

// ============================================================================
// Types
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Retry policy for every request.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Docbase settings.
    #[serde(default)]
    pub docbase: DocbaseSettings,
    /// Slack settings.
    #[serde(default)]
    pub slack: SlackSettings,
    /// GitHub settings.
    #[serde(default)]
    pub github: ServiceSettings,
    /// Qiita settings.
    #[serde(default)]
    pub qiita: ServiceSettings,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Transport timeout per request attempt, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log filter used when neither `--verbose` nor `RUST_LOG` is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Retry policy as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each further retry.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Error kinds worth retrying.
    #[serde(default = "default_retryable")]
    pub retryable: Vec<ApiErrorKind>,
}

/// Settings shared by token-authenticated services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Environment variable holding the token. Defaults per service.
    #[serde(default)]
    pub token_env: Option<String>,
    /// API base URL override (enterprise or team hosts).
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Docbase settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocbaseSettings {
    /// Default team domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Token variable and base URL.
    #[serde(flatten)]
    pub service: ServiceSettings,
}

/// Slack settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackSettings {
    /// Ceiling on search matches expanded by `collect`.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
    /// Search page size used by `collect`.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Token variable and base URL.
    #[serde(flatten)]
    pub service: ServiceSettings,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_max_retries() -> u32 {
    gleaner_fetch::retry::DEFAULT_MAX_RETRIES
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_retryable() -> Vec<ApiErrorKind> {
    vec![ApiErrorKind::Network, ApiErrorKind::RateLimit]
}

fn default_max_messages() -> usize {
    CollectOptions::default().max_messages
}

fn default_page_size() -> u32 {
    CollectOptions::default().page_size
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            retryable: default_retryable(),
        }
    }
}

impl Default for SlackSettings {
    fn default() -> Self {
        Self {
            max_messages: default_max_messages(),
            page_size: default_page_size(),
            service: ServiceSettings::default(),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl RetrySettings {
    /// Builds the runtime retry policy.
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig::new(self.max_retries)
            .with_initial_backoff(Duration::from_millis(self.initial_backoff_ms))
            .with_retryable(self.retryable.iter().copied())
    }
}

impl SlackSettings {
    /// Returns the collection limits.
    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            max_messages: self.max_messages,
            page_size: self.page_size,
        }
    }
}

impl GeneralConfig {
    /// Returns the transport timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Loading and Saving
// ============================================================================

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gleaner")
            .join("config.json")
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Rejects values no request could work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.timeout_secs == 0 {
            return Err(ConfigError::Invalid("general.timeout_secs must be positive".into()));
        }
        if self.slack.page_size == 0 || self.slack.page_size > 100 {
            return Err(ConfigError::Invalid(format!(
                "slack.page_size must be between 1 and 100, got {}",
                self.slack.page_size
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    fn service_settings(&self, kind: ServiceKind) -> Option<&ServiceSettings> {
        match kind {
            ServiceKind::Docbase => Some(&self.docbase.service),
            ServiceKind::Slack => Some(&self.slack.service),
            ServiceKind::GitHub => Some(&self.github),
            ServiceKind::Qiita => Some(&self.qiita),
            ServiceKind::Zenn => None,
        }
    }

    /// Returns the environment variable holding a service's token.
    ///
    /// `None` for services without authentication.
    pub fn token_env(&self, kind: ServiceKind) -> Option<&str> {
        self.service_settings(kind)
            .and_then(|s| s.token_env.as_deref())
            .filter(|name| !name.trim().is_empty())
            .or_else(|| kind.default_token_env())
    }

    /// Returns the configured API base URL override for a service.
    pub fn base_url(&self, kind: ServiceKind) -> Option<&str> {
        self.service_settings(kind).and_then(|s| s.base_url.as_deref())
    }

    /// Resolves a service token through `lookup`, treating blanks as unset.
    pub fn token_with<F>(&self, kind: ServiceKind, lookup: F) -> Option<String>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let env = self.token_env(kind)?;
        lookup(env)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Reads a service token from the environment, if set.
    pub fn optional_token(&self, kind: ServiceKind) -> Option<String> {
        self.token_with(kind, |name| std::env::var(name).ok())
    }

    /// Reads a required service token from the environment.
    pub fn token_for(&self, kind: ServiceKind) -> Result<String, ConfigError> {
        self.optional_token(kind).ok_or_else(|| ConfigError::MissingToken {
            service: kind,
            env: self.token_env(kind).unwrap_or("<none>").to_string(),
        })
    }
}
