//! Application configuration loaded from environment variables.
//!
//! All values are optional:
//! - `COINBOARD_API_URL`: base URL of the Upbit REST API
//! - `COINBOARD_REQUEST_TIMEOUT_SECS`: per-request HTTP timeout in seconds
//! - `COINBOARD_CANDLE_COUNT`: daily candles fetched per market at startup
//! - `COINBOARD_REQUESTS_PER_SECOND`: pace of the per-market candle requests
//! - `COINBOARD_MAX_RETRIES`: retries of a throttled (429) request

use std::time::Duration;

use crate::CoinboardError;

/// Default public REST endpoint.
const DEFAULT_API_URL: &str = "https://api.upbit.com/v1";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const DEFAULT_CANDLE_COUNT: u32 = 1;

/// Upbit caps the `count` query parameter of the candle endpoints at 200.
const MAX_CANDLE_COUNT: u32 = 200;

const DEFAULT_REQUESTS_PER_SECOND: u32 = 8;

/// Upbit allows 10 quotation requests per second per client.
const MAX_REQUESTS_PER_SECOND: u32 = 10;

const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub upbit: UpbitConfig,
}

/// Upbit-specific configuration values.
#[derive(Debug, Clone)]
pub struct UpbitConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub candle_count: u32,
    /// Minimum gap between the starts of two candle requests.
    pub request_spacing: Duration,
    /// How often a request answered with 429 is sent again.
    pub max_retries: u32,
    /// Wait before the first retry; doubles on each further one.
    pub retry_backoff: Duration,
}

impl Default for UpbitConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            candle_count: DEFAULT_CANDLE_COUNT,
            request_spacing: spacing_for(DEFAULT_REQUESTS_PER_SECOND),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

fn spacing_for(requests_per_second: u32) -> Duration {
    Duration::from_secs(1) / requests_per_second
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`CoinboardError::Config`] if a numeric variable cannot be
/// parsed, the candle count is outside `1..=200`, or the request rate is
/// outside `1..=10`.
pub fn fetch_config() -> crate::Result<AppConfig> {
    config_from(non_empty_var)
}

/// Builds the configuration from an arbitrary variable lookup.
fn config_from<F>(lookup: F) -> crate::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let api_url = lookup("COINBOARD_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let timeout_secs = match lookup("COINBOARD_REQUEST_TIMEOUT_SECS") {
        Some(raw) => parse_number::<u64>("COINBOARD_REQUEST_TIMEOUT_SECS", &raw)?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };

    let candle_count = match lookup("COINBOARD_CANDLE_COUNT") {
        Some(raw) => parse_number::<u32>("COINBOARD_CANDLE_COUNT", &raw)?,
        None => DEFAULT_CANDLE_COUNT,
    };
    if !(1..=MAX_CANDLE_COUNT).contains(&candle_count) {
        return Err(CoinboardError::Config(format!(
            "COINBOARD_CANDLE_COUNT must be between 1 and {MAX_CANDLE_COUNT}, got {candle_count}"
        )));
    }

    let requests_per_second = match lookup("COINBOARD_REQUESTS_PER_SECOND") {
        Some(raw) => parse_number::<u32>("COINBOARD_REQUESTS_PER_SECOND", &raw)?,
        None => DEFAULT_REQUESTS_PER_SECOND,
    };
    if !(1..=MAX_REQUESTS_PER_SECOND).contains(&requests_per_second) {
        return Err(CoinboardError::Config(format!(
            "COINBOARD_REQUESTS_PER_SECOND must be between 1 and {MAX_REQUESTS_PER_SECOND}, got {requests_per_second}"
        )));
    }

    let max_retries = match lookup("COINBOARD_MAX_RETRIES") {
        Some(raw) => parse_number::<u32>("COINBOARD_MAX_RETRIES", &raw)?,
        None => DEFAULT_MAX_RETRIES,
    };

    Ok(AppConfig {
        upbit: UpbitConfig {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            candle_count,
            request_spacing: spacing_for(requests_per_second),
            max_retries,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        },
    })
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> crate::Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| CoinboardError::Config(format!("{name} is not a valid number: {raw:?}")))
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
