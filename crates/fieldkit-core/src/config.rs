//! # Rate Limit Configuration
//!
//! Settings for [`RateLimiter`](crate::rate_limit::RateLimiter).
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FIELDKIT_RATE_LIMIT_MAX_ATTEMPTS=10                                │
//! │     FIELDKIT_RATE_LIMIT_WINDOW_MS=30000                                │
//! │                                                                         │
//! │  2. TOML (supplied by the host application)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     5 attempts per 60 000 ms                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration Format
//! ```toml
//! [rate_limit]
//! max_attempts = 5
//! window_ms = 60000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::ConfigError;

/// Environment variable overriding [`RateLimitConfig::max_attempts`].
pub const ENV_MAX_ATTEMPTS: &str = "FIELDKIT_RATE_LIMIT_MAX_ATTEMPTS";

/// Environment variable overriding [`RateLimitConfig::window_ms`].
pub const ENV_WINDOW_MS: &str = "FIELDKIT_RATE_LIMIT_WINDOW_MS";

fn default_max_attempts() -> usize {
    5
}

fn default_window_ms() -> u64 {
    60_000
}

// =============================================================================
// Rate Limit Config
// =============================================================================

/// Sliding-window limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateLimitConfig {
    /// Admissions allowed per identifier within one window.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Window length in milliseconds.
    #[serde(default = "default_window_ms")]
    #[ts(type = "number")]
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        RateLimitConfig {
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
        }
    }
}

/// Wrapper so the config can live under a `[rate_limit]` table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rate_limit: RateLimitConfig,
}

impl RateLimitConfig {
    /// Window as a `Duration`.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Loads configuration from TOML, then the environment, then validates.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. `[rate_limit]` table of `toml_src`, if given
    /// 3. Environment variables
    pub fn load(toml_src: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match toml_src {
            Some(src) => toml::from_str::<ConfigFile>(src)?.rate_limit,
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(toml_src: Option<&str>) -> Self {
        Self::load(toml_src).unwrap_or_else(|e| {
            warn!("Failed to load rate limit config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_attempts".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.window_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "window_ms".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from any key lookup; split out so tests don't
    /// touch the process environment.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MAX_ATTEMPTS) {
            self.max_attempts = parse_override(ENV_MAX_ATTEMPTS, &raw)?;
            debug!(max_attempts = self.max_attempts, "Overriding max attempts from environment");
        }

        if let Some(raw) = lookup(ENV_WINDOW_MS) {
            self.window_ms = parse_override(ENV_WINDOW_MS, &raw)?;
            debug!(window_ms = self.window_ms, "Overriding window from environment");
        }

        Ok(())
    }
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        reason: format!("cannot parse {:?}: {}", raw, e),
    })
}
