//! Client configuration assembled from the environment.
//!
//! # Environment Variables
//!
//! | Variable | Fallback | Default |
//! |----------|----------|---------|
//! | `TICKERFEED_ALPHAVANTAGE_KEYS` | `ALPHAVANTAGE_API_KEY` | none |
//! | `TICKERFEED_MARKETAUX_KEYS` | `MARKETAUX_API_KEY` | none |
//! | `TICKERFEED_MAX_CALLS_PER_MINUTE` | | `4` |
//! | `TICKERFEED_CACHE_TTL_SECS` | | `1800` |
//! | `TICKERFEED_MAX_RETRIES` | | `2` |
//! | `TICKERFEED_BACKOFF_SECS` | | `15` |
//! | `TICKERFEED_HTTP_TIMEOUT_MS` | | `10000` |
//! | `TICKERFEED_DEMO_MODE` | | `false` |
//! | `TICKERFEED_DEMO_SYMBOLS` | | `IBM` |
//! | `TICKERFEED_ROTATE_ON_DAILY_CAP` | | `false` |
//! | `TICKERFEED_ALPHAVANTAGE_URL` | | provider endpoint |
//! | `TICKERFEED_MARKETAUX_URL` | | provider endpoint |
//!
//! Key lists are comma-separated and tried in the order given.

use std::str::FromStr;
use std::time::Duration;

use crate::adapters::{alphavantage, marketaux};
use crate::cache::DEFAULT_CACHE_TTL;
use crate::credential::CredentialPool;
use crate::error::ConfigError;
use crate::http_client::DEFAULT_TIMEOUT_MS;
use crate::retry::{RetryConfig, DEFAULT_MAX_RETRIES, DEFAULT_THROTTLE_BACKOFF};
use crate::throttling::DEFAULT_MAX_CALLS_PER_MINUTE;

const ENV_PREFIX: &str = "TICKERFEED_";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub price_credentials: CredentialPool,
    pub news_credentials: CredentialPool,
    pub price_base_url: String,
    pub news_base_url: String,
    pub max_calls_per_minute: usize,
    pub cache_ttl: Duration,
    pub retry: RetryConfig,
    pub http_timeout_ms: u64,
    /// Force the single `demo` credential and restrict symbols to `demo_symbols`.
    pub demo_mode: bool,
    pub demo_symbols: Vec<String>,
    /// Keep rotating after a credential reports its daily cap.
    pub rotate_on_daily_cap: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            price_credentials: CredentialPool::default(),
            news_credentials: CredentialPool::default(),
            price_base_url: String::from(alphavantage::DEFAULT_BASE_URL),
            news_base_url: String::from(marketaux::DEFAULT_BASE_URL),
            max_calls_per_minute: DEFAULT_MAX_CALLS_PER_MINUTE,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry: RetryConfig::default(),
            http_timeout_ms: DEFAULT_TIMEOUT_MS,
            demo_mode: false,
            demo_symbols: vec![String::from("IBM")],
            rotate_on_daily_cap: false,
        }
    }
}

impl ClientConfig {
    /// Demo configuration: no real keys needed, only allow-listed symbols.
    pub fn demo() -> Self {
        Self {
            demo_mode: true,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| -> Option<(String, String)> {
            let name = format!("{ENV_PREFIX}{suffix}");
            lookup(&name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (name, value))
        };
        let keys = |suffix: &str, fallback: &str| -> CredentialPool {
            get(suffix)
                .map(|(_, value)| value)
                .or_else(|| lookup(fallback))
                .map(|value| CredentialPool::new(value.split(',')))
                .unwrap_or_default()
        };

        let mut config = Self {
            price_credentials: keys("ALPHAVANTAGE_KEYS", "ALPHAVANTAGE_API_KEY"),
            news_credentials: keys("MARKETAUX_KEYS", "MARKETAUX_API_KEY"),
            ..Self::default()
        };

        if let Some((_, url)) = get("ALPHAVANTAGE_URL") {
            config.price_base_url = url.trim().to_owned();
        }
        if let Some((_, url)) = get("MARKETAUX_URL") {
            config.news_base_url = url.trim().to_owned();
        }
        if let Some((name, value)) = get("MAX_CALLS_PER_MINUTE") {
            config.max_calls_per_minute = parse_positive(&name, &value)?;
        }
        if let Some((name, value)) = get("CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse_number(&name, &value)?);
        }
        if let Some((name, value)) = get("MAX_RETRIES") {
            config.retry.max_retries = parse_number(&name, &value)?;
        }
        if let Some((name, value)) = get("BACKOFF_SECS") {
            let delay = Duration::from_secs(parse_number(&name, &value)?);
            config.retry = RetryConfig::fixed(delay, config.retry.max_retries);
        }
        if let Some((name, value)) = get("HTTP_TIMEOUT_MS") {
            config.http_timeout_ms = parse_positive(&name, &value)?;
        }
        if let Some((name, value)) = get("DEMO_MODE") {
            config.demo_mode = parse_bool(&name, &value)?;
        }
        if let Some((_, value)) = get("DEMO_SYMBOLS") {
            config.demo_symbols = value
                .split(',')
                .map(|symbol| symbol.trim().to_ascii_uppercase())
                .filter(|symbol| !symbol.is_empty())
                .collect();
        }
        if let Some((name, value)) = get("ROTATE_ON_DAILY_CAP") {
            config.rotate_on_daily_cap = parse_bool(&name, &value)?;
        }

        Ok(config)
    }
}

fn invalid(name: &str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_owned(),
        value: value.to_owned(),
        reason: reason.into(),
    }
}

fn parse_number<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|error| invalid(name, value, error.to_string()))
}

fn parse_positive<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let parsed = parse_number::<T>(name, value)?;
    if parsed == T::default() {
        return Err(invalid(name, value, "must be greater than zero"));
    }
    Ok(parsed)
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(name, value, "expected true or false")),
    }
}
