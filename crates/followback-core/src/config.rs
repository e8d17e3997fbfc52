use crate::app_config::{AppConfig, Credentials, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value: u64 = parse_as(var, &or_default(var, default))?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let credential = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| is_real_credential(v))
    };

    let env = parse_environment(&or_default("FOLLOWBACK_ENV", "development"))?;
    let bind_addr: SocketAddr =
        parse_as("FOLLOWBACK_BIND_ADDR", &or_default("FOLLOWBACK_BIND_ADDR", "0.0.0.0:3000"))?;
    let log_level = or_default("FOLLOWBACK_LOG_LEVEL", "info");

    let request_timeout_secs = parse_positive_u64("FOLLOWBACK_REQUEST_TIMEOUT_SECS", "15")?;
    let source_timeout_secs = parse_positive_u64("FOLLOWBACK_SOURCE_TIMEOUT_SECS", "20")?;
    let deadline_secs = parse_positive_u64("FOLLOWBACK_DEADLINE_SECS", "45")?;
    let cache_ttl_secs = parse_positive_u64("FOLLOWBACK_CACHE_TTL_SECS", "300")?;
    let cache_capacity: usize = parse_as(
        "FOLLOWBACK_CACHE_CAPACITY",
        &or_default("FOLLOWBACK_CACHE_CAPACITY", "1024"),
    )?;
    let max_retries: u32 =
        parse_as("FOLLOWBACK_MAX_RETRIES", &or_default("FOLLOWBACK_MAX_RETRIES", "1"))?;
    let retry_backoff_base_ms: u64 = parse_as(
        "FOLLOWBACK_RETRY_BACKOFF_BASE_MS",
        &or_default("FOLLOWBACK_RETRY_BACKOFF_BASE_MS", "500"),
    )?;
    let page_size: u32 = parse_as("FOLLOWBACK_PAGE_SIZE", &or_default("FOLLOWBACK_PAGE_SIZE", "200"))?;
    let pagination_max_pages: usize = parse_as(
        "FOLLOWBACK_PAGINATION_MAX_PAGES",
        &or_default("FOLLOWBACK_PAGINATION_MAX_PAGES", "50"),
    )?;
    let pagination_max_items: usize = parse_as(
        "FOLLOWBACK_PAGINATION_MAX_ITEMS",
        &or_default("FOLLOWBACK_PAGINATION_MAX_ITEMS", "10000"),
    )?;
    let rate_limit_backoff_ms: u64 = parse_as(
        "FOLLOWBACK_RATE_LIMIT_BACKOFF_MS",
        &or_default("FOLLOWBACK_RATE_LIMIT_BACKOFF_MS", "2000"),
    )?;

    if cache_capacity == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOLLOWBACK_CACHE_CAPACITY".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let credentials = Credentials {
        instagram_access_token: credential("INSTAGRAM_ACCESS_TOKEN"),
        rapidapi_key: credential("RAPIDAPI_KEY"),
        scrapingbee_key: credential("SCRAPINGBEE_KEY"),
        brightdata_key: credential("BRIGHTDATA_KEY"),
        zyte_key: credential("ZYTE_KEY"),
        apify_token: credential("APIFY_TOKEN"),
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        credentials,
        request_timeout_secs,
        source_timeout_secs,
        deadline_secs,
        cache_ttl_secs,
        cache_capacity,
        max_retries,
        retry_backoff_base_ms,
        page_size,
        pagination_max_pages,
        pagination_max_items,
        rate_limit_backoff_ms,
    })
}

/// Blank values and `.env.example` placeholders (`your_..._here`) count as absent.
fn is_real_credential(value: &str) -> bool {
    !value.is_empty() && !value.starts_with("your_")
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOLLOWBACK_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
