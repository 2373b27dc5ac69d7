//! Process configuration read from `OVERSEER_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.
//! Every variable except the token secret has a default.

use crate::advisory::adapters::SlidingWindow;
use crate::advisory::services::AdvisorySettings;
use crate::auth::{MIN_SECRET_LENGTH, TokenConfig};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Signing secret for bearer tokens.
pub const TOKEN_SECRET: &str = "OVERSEER_TOKEN_SECRET";
/// Token lifetime in minutes.
pub const TOKEN_TTL_MINUTES: &str = "OVERSEER_TOKEN_TTL_MINUTES";
/// Expected token issuer.
pub const TOKEN_ISSUER: &str = "OVERSEER_TOKEN_ISSUER";
/// Expected token audience.
pub const TOKEN_AUDIENCE: &str = "OVERSEER_TOKEN_AUDIENCE";
/// Upper bound on one persistence call, in milliseconds.
pub const STORE_TIMEOUT_MS: &str = "OVERSEER_STORE_TIMEOUT_MS";
/// Feature toggle for advisory suggestions.
pub const ADVISORY_ENABLED: &str = "OVERSEER_ADVISORY_ENABLED";
/// Upper bound on one advisory call, in milliseconds.
pub const ADVISORY_TIMEOUT_MS: &str = "OVERSEER_ADVISORY_TIMEOUT_MS";
/// Advisory requests admitted per principal and window.
pub const ADVISORY_MAX_REQUESTS: &str = "OVERSEER_ADVISORY_MAX_REQUESTS";
/// Advisory rate-limit window, in seconds.
pub const ADVISORY_WINDOW_SECS: &str = "OVERSEER_ADVISORY_WINDOW_SECS";
/// Default log filter when `RUST_LOG` is unset.
pub const LOG_LEVEL: &str = "OVERSEER_LOG_LEVEL";
/// Emit JSON log lines instead of plain text.
pub const LOG_JSON: &str = "OVERSEER_LOG_JSON";

const DEFAULT_TTL_MINUTES: u32 = 1440;
const DEFAULT_ISSUER: &str = "overseer";
const DEFAULT_AUDIENCE: &str = "overseer-clients";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ADVISORY_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ADVISORY_MAX_REQUESTS: usize = 10;
const DEFAULT_ADVISORY_WINDOW_SECS: u32 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("{0} must be set")]
    Missing(&'static str),
    /// A variable holds an unusable value.
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Advisory side-call configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisoryConfig {
    /// Feature toggle.
    pub enabled: bool,
    /// Upper bound on one provider call.
    pub timeout: Duration,
    /// Per-principal rate-limit window.
    pub window: SlidingWindow,
}

impl AdvisoryConfig {
    /// Returns the settings consumed by the advisory service.
    #[must_use]
    pub const fn settings(&self) -> AdvisorySettings {
        AdvisorySettings {
            enabled: self.enabled,
            timeout: self.timeout,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// JSON output when `true`.
    pub json: bool,
}

/// Complete service configuration.
#[derive(Clone)]
pub struct ServiceConfig {
    /// Bearer-token settings.
    pub token: TokenConfig,
    /// Upper bound on one persistence call.
    pub store_timeout: Duration,
    /// Advisory settings.
    pub advisory: AdvisoryConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("token", &self.token)
            .field("store_timeout", &self.store_timeout)
            .field("advisory", &self.advisory)
            .field("log", &self.log)
            .finish()
    }
}

impl ServiceConfig {
    /// Loads `.env` if present and reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing secret or an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!(reason = %err, "no .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing secret or an unparsable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let secret = vars
            .get(TOKEN_SECRET)
            .ok_or(ConfigError::Missing(TOKEN_SECRET))?;
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                key: TOKEN_SECRET,
                value: "<redacted>".to_owned(),
                reason: format!("must be at least {MIN_SECRET_LENGTH} bytes"),
            });
        }
        let ttl_minutes = vars.positive(TOKEN_TTL_MINUTES, DEFAULT_TTL_MINUTES)?;
        let window_secs = vars.positive(ADVISORY_WINDOW_SECS, DEFAULT_ADVISORY_WINDOW_SECS)?;

        Ok(Self {
            token: TokenConfig {
                secret,
                ttl: chrono::Duration::minutes(i64::from(ttl_minutes)),
                issuer: vars
                    .get(TOKEN_ISSUER)
                    .unwrap_or_else(|| DEFAULT_ISSUER.to_owned()),
                audience: vars
                    .get(TOKEN_AUDIENCE)
                    .unwrap_or_else(|| DEFAULT_AUDIENCE.to_owned()),
            },
            store_timeout: Duration::from_millis(
                vars.positive(STORE_TIMEOUT_MS, DEFAULT_STORE_TIMEOUT_MS)?,
            ),
            advisory: AdvisoryConfig {
                enabled: vars.flag(ADVISORY_ENABLED, false)?,
                timeout: Duration::from_millis(
                    vars.positive(ADVISORY_TIMEOUT_MS, DEFAULT_ADVISORY_TIMEOUT_MS)?,
                ),
                window: SlidingWindow {
                    max_requests: vars
                        .parsed(ADVISORY_MAX_REQUESTS, DEFAULT_ADVISORY_MAX_REQUESTS)?,
                    length: chrono::Duration::seconds(i64::from(window_secs)),
                },
            },
            log: LogConfig {
                level: vars
                    .get(LOG_LEVEL)
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
                json: vars.flag(LOG_JSON, false)?,
            },
        })
    }
}

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn parsed<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.parse().map_err(|err: T::Err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
                value: raw,
            })
        })
    }

    fn positive<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + Default + PartialEq + fmt::Display,
        T::Err: fmt::Display,
    {
        let value = self.parsed(key, default)?;
        if value == T::default() {
            return Err(ConfigError::Invalid {
                key,
                value: value.to_string(),
                reason: "must be greater than zero".to_owned(),
            });
        }
        Ok(value)
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: raw,
                reason: "expected true or false".to_owned(),
            }),
        }
    }
}
