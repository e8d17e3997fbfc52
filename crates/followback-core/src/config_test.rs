use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FOLLOWBACK_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults are valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.source_timeout_secs, 20);
    assert_eq!(cfg.deadline_secs, 45);
    assert_eq!(cfg.cache_ttl_secs, 300);
    assert_eq!(cfg.cache_capacity, 1024);
    assert_eq!(cfg.max_retries, 1);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.page_size, 200);
    assert_eq!(cfg.pagination_max_pages, 50);
    assert_eq!(cfg.pagination_max_items, 10_000);
    assert_eq!(cfg.rate_limit_backoff_ms, 2_000);
    assert!(cfg.credentials.rapidapi_key.is_none());
    assert!(cfg.credentials.apify_token.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("FOLLOWBACK_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOLLOWBACK_BIND_ADDR"),
        "expected InvalidEnvVar(FOLLOWBACK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_overrides_deadline() {
    let mut map = HashMap::new();
    map.insert("FOLLOWBACK_DEADLINE_SECS", "30");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.deadline_secs, 30);
}

#[test]
fn build_app_config_rejects_zero_deadline() {
    let mut map = HashMap::new();
    map.insert("FOLLOWBACK_DEADLINE_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOLLOWBACK_DEADLINE_SECS"),
        "expected InvalidEnvVar(FOLLOWBACK_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_cache_ttl() {
    let mut map = HashMap::new();
    map.insert("FOLLOWBACK_CACHE_TTL_SECS", "five minutes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOLLOWBACK_CACHE_TTL_SECS"),
        "expected InvalidEnvVar(FOLLOWBACK_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_cache_capacity() {
    let mut map = HashMap::new();
    map.insert("FOLLOWBACK_CACHE_CAPACITY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOLLOWBACK_CACHE_CAPACITY"),
        "expected InvalidEnvVar(FOLLOWBACK_CACHE_CAPACITY), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_credentials() {
    let mut map = HashMap::new();
    map.insert("RAPIDAPI_KEY", "rk-123");
    map.insert("APIFY_TOKEN", "  apify-abc  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.credentials.rapidapi_key.as_deref(), Some("rk-123"));
    assert_eq!(cfg.credentials.apify_token.as_deref(), Some("apify-abc"));
}

#[test]
fn build_app_config_treats_placeholder_credentials_as_absent() {
    let mut map = HashMap::new();
    map.insert("RAPIDAPI_KEY", "your_rapidapi_key_here");
    map.insert("ZYTE_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.credentials.rapidapi_key.is_none());
    assert!(cfg.credentials.zyte_key.is_none());
}

#[test]
fn credentials_debug_output_is_redacted() {
    let mut map = HashMap::new();
    map.insert("SCRAPINGBEE_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("[redacted]"));
}
