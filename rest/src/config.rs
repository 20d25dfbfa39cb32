//! Process configuration, read once from the environment at startup

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    DEFAULT_FEED_CONCURRENCY, DEFAULT_FEED_RESULT_LIMIT, DEFAULT_MAX_SUBSCRIPTIONS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_YOUTUBE_API_BASE_URL,
};
use crate::domain::feed::FeedOptions;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_REPLENISH_SECS: u64 = 2;
const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

/// Per-IP limiter on the credentialed routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Seconds until one more request is allowed
    pub replenish_secs: u64,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub youtube: YouTubeConfig,
    pub feed: FeedOptions,
    /// `None` when rate limiting is disabled
    pub rate_limit: Option<RateLimitConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("YOUTUBE_API_KEY").ok_or(ConfigError::Missing("YOUTUBE_API_KEY"))?;

        // A zero timeout would fail every upstream call immediately
        let timeout_secs: u64 = parse_or(
            &get,
            "YOUTUBE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "YOUTUBE_REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let youtube = YouTubeConfig {
            api_key,
            base_url: get("YOUTUBE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_API_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        };

        let feed = FeedOptions {
            max_subscriptions: parse_or(&get, "MAX_SUBSCRIPTIONS", DEFAULT_MAX_SUBSCRIPTIONS)?,
            result_limit: parse_or(&get, "FEED_RESULT_LIMIT", DEFAULT_FEED_RESULT_LIMIT)?,
            concurrency: parse_or(&get, "FEED_CONCURRENCY", DEFAULT_FEED_CONCURRENCY)?.max(1),
        };

        let rate_limit = if parse_or(&get, "RATE_LIMIT_ENABLED", true)? {
            Some(RateLimitConfig {
                replenish_secs: parse_or(
                    &get,
                    "RATE_LIMIT_REPLENISH_SECS",
                    DEFAULT_RATE_LIMIT_REPLENISH_SECS,
                )?,
                burst: parse_or(&get, "RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST)?,
            })
        } else {
            None
        };

        Ok(Self {
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            youtube,
            feed,
            rate_limit,
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
