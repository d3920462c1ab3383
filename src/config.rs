//! Client configuration
//!
//! Configuration can be loaded from YAML or assembled with
//! [`ClientConfig::builder`]. Every field has a default, so an empty document
//! is a valid configuration.
//!
//! ```yaml
//! base_url: https://api.chess.com/pub
//! timeout_ms: 30000
//! rate_limit:
//!   quota: 300
//!   window_ms: 60000
//! retry:
//!   max_attempts: 3
//!   base_backoff_ms: 50
//!   backoff_multiplier: 2.0
//!   jitter_ms: 100
//!   max_backoff_ms: 10000
//!   retry_on: [rate_limited, transient]
//! ```

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::{OutcomeClass, RateLimiterConfig, RetryPolicy};
use crate::types::{LogLevel, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.chess.com/pub";

// ============================================================================
// Top-Level Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for API requests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headers sent with every request
    #[serde(default = "default_headers")]
    pub default_headers: StringMap,

    /// Static credentials
    #[serde(default)]
    pub auth: Credentials,

    /// Rate limiting (`null` disables it)
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimitConfig>,

    /// Retry behaviour
    #[serde(default)]
    pub retry: RetryConfig,

    /// Log level for the command-line tool
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            default_headers: default_headers(),
            auth: Credentials::default(),
            rate_limit: default_rate_limit(),
            retry: RetryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("chesscom-api/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_headers() -> StringMap {
    let mut headers = StringMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}

fn default_rate_limit() -> Option<RateLimitConfig> {
    Some(RateLimitConfig::default())
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load and validate a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML config document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ClientConfig = if yaml.trim().is_empty() {
            ClientConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(Error::invalid_value("timeout_ms", "must be greater than 0"));
        }

        if let Some(ref rate_limit) = self.rate_limit {
            if rate_limit.quota == 0 {
                return Err(Error::invalid_value("rate_limit.quota", "must be greater than 0"));
            }
            if rate_limit.window_ms == 0 {
                return Err(Error::invalid_value(
                    "rate_limit.window_ms",
                    "must be greater than 0",
                ));
            }
        }

        self.retry.validate()
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Rate limiter settings, if rate limiting is enabled
    pub fn rate_limiter_config(&self) -> Option<RateLimiterConfig> {
        self.rate_limit.as_ref().map(RateLimitConfig::to_limiter_config)
    }

    /// Immutable retry policy built from the retry settings
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.to_policy()
    }
}

// ============================================================================
// Rate Limit Config
// ============================================================================

/// Quota of `quota` requests per `window_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    #[serde(default = "default_quota")]
    pub quota: u32,

    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            quota: default_quota(),
            window_ms: default_window_ms(),
        }
    }
}

fn default_quota() -> u32 {
    300
}

fn default_window_ms() -> u64 {
    60_000
}

impl RateLimitConfig {
    /// Convert to the runtime limiter configuration
    pub fn to_limiter_config(&self) -> RateLimiterConfig {
        RateLimiterConfig::new(self.quota, Duration::from_millis(self.window_ms))
    }
}

// ============================================================================
// Retry Config
// ============================================================================

/// Retry and backoff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum network attempts per call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt in milliseconds
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Growth factor between consecutive backoffs
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Maximum random addition to each backoff in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,

    /// Backoff cap in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Outcome classes that may be retried
    #[serde(default = "default_retry_on")]
    pub retry_on: Vec<OutcomeClass>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter_ms: default_jitter_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            retry_on: default_retry_on(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_backoff_ms() -> u64 {
    50
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_jitter_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    10_000
}

fn default_retry_on() -> Vec<OutcomeClass> {
    vec![OutcomeClass::RateLimited, OutcomeClass::Transient]
}

impl RetryConfig {
    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_value("retry.max_attempts", "must be at least 1"));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(Error::invalid_value(
                "retry.backoff_multiplier",
                "must be a finite number >= 1.0",
            ));
        }
        if self.base_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_value(
                "retry.base_backoff_ms",
                "must not exceed retry.max_backoff_ms",
            ));
        }
        if let Some(class) = self
            .retry_on
            .iter()
            .find(|c| matches!(c, OutcomeClass::Success | OutcomeClass::Permanent))
        {
            return Err(Error::invalid_value(
                "retry.retry_on",
                format!("'{class}' outcomes cannot be retried"),
            ));
        }
        Ok(())
    }

    /// Build the runtime retry policy
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(self.max_attempts)
            .backoff(
                Duration::from_millis(self.base_backoff_ms),
                self.backoff_multiplier,
                Duration::from_millis(self.max_backoff_ms),
            )
            .jitter(Duration::from_millis(self.jitter_ms))
            .retry_on(self.retry_on.iter().copied())
            .build()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set max attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, base: Duration, multiplier: f64, max: Duration) -> Self {
        self.config.retry.base_backoff_ms = base.as_millis() as u64;
        self.config.retry.backoff_multiplier = multiplier;
        self.config.retry.max_backoff_ms = max.as_millis() as u64;
        self
    }

    /// Set backoff jitter
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.config.retry.jitter_ms = jitter.as_millis() as u64;
        self
    }

    /// Set the retryable outcome classes
    pub fn retry_on(mut self, classes: impl IntoIterator<Item = OutcomeClass>) -> Self {
        self.config.retry.retry_on = classes.into_iter().collect();
        self
    }

    /// Set rate limiter quota
    pub fn rate_limit(mut self, quota: u32, window: Duration) -> Self {
        self.config.rate_limit = Some(RateLimitConfig {
            quota,
            window_ms: window.as_millis() as u64,
        });
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set static credentials
    pub fn auth(mut self, auth: Credentials) -> Self {
        self.config.auth = auth;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
