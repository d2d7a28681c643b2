//! Pool manager configuration

use poolgate_core::{PoolError, Result};
use serde::{Deserialize, Serialize};

use crate::retry::BackoffStrategy;

/// Default number of attempts in one retry cycle
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default name used in log lines and the exhausted-retries error
pub const DEFAULT_POOL_NAME: &str = "database client";

/// Configuration for a pool manager
///
/// Controls the retry bound, the backoff between attempts, and the name the
/// pool reports itself under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Human-readable pool identity
    name: String,
    /// Attempts per retry cycle before giving up
    max_attempts: u32,
    /// Delay between attempts
    backoff: BackoffStrategy,
}

impl PoolConfig {
    /// Create a configuration with the given name and default retry settings
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from a TOML document and validate it
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// ```
    /// use poolgate_connection::PoolConfig;
    ///
    /// let config = PoolConfig::from_toml_str("name = \"orders\"\nmax_attempts = 3").unwrap();
    /// assert_eq!(config.name(), "orders");
    /// assert_eq!(config.max_attempts(), 3);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| PoolError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the pool name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of attempts per retry cycle
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff strategy
    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Check the configuration for values the pool cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(PoolError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.name.trim().is_empty() {
            return Err(PoolError::Configuration(
                "pool name must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the pool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of attempts per retry cycle
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Get the backoff strategy
    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }
}

impl Default for PoolConfig {
    /// Defaults:
    /// - name: "database client"
    /// - max_attempts: 10
    /// - backoff: 1000ms * attempt^2, uncapped
    fn default() -> Self {
        Self {
            name: DEFAULT_POOL_NAME.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: BackoffStrategy::default(),
        }
    }
}
