//! Environment variable helpers

use std::time::Duration;

/// Read an environment variable, treating unset and blank values the same way.
pub fn env_string(key: &str) -> Option<String> {
    non_blank(std::env::var(key).ok())
}

/// Read a millisecond duration from the environment.
///
/// Unparseable or zero values are ignored so that defaults stay in effect.
pub fn env_millis(key: &str) -> Option<Duration> {
    env_string(key).as_deref().and_then(parse_millis)
}

/// Parse a positive integer number of milliseconds.
pub fn parse_millis(raw: &str) -> Option<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(ms) => Some(Duration::from_millis(ms)),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
