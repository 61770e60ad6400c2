//! Environment Configuration Helpers
//!
//! Typed readers over process environment variables. Empty values count as
//! unset.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(String),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Read a variable; unset or blank yields `None`
pub fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read a variable that must be present
pub fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Parse a variable, falling back to `default` when unset
pub fn parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match optional(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Whole seconds as a [`Duration`]; zero is rejected
pub fn duration_secs(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    let secs = parse_or(name, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name: name.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

/// Boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`)
pub fn flag(name: &str, default: bool) -> Result<bool, ConfigError> {
    match optional(name) {
        Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
            name: name.to_string(),
            reason: format!("expected a boolean, got {:?}", raw),
        }),
        None => Ok(default),
    }
}

/// Comma separated list, blanks dropped
pub fn list(name: &str) -> Vec<String> {
    optional(name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 各テストは固有の変数名を使う（テストは並列実行される）
    fn set(name: &str, value: &str) {
        unsafe { std::env::set_var(name, value) };
    }

    #[test]
    fn test_optional_treats_blank_as_unset() {
        set("PLATFORM_TEST_BLANK", "   ");
        assert_eq!(optional("PLATFORM_TEST_BLANK"), None);
        assert!(matches!(
            required("PLATFORM_TEST_BLANK"),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_parse_or() {
        set("PLATFORM_TEST_PORT", "8080");
        assert_eq!(parse_or("PLATFORM_TEST_PORT", 1u16), Ok(8080));
        assert_eq!(parse_or("PLATFORM_TEST_UNSET", 7u16), Ok(7));

        set("PLATFORM_TEST_BAD_PORT", "eighty");
        assert!(matches!(
            parse_or("PLATFORM_TEST_BAD_PORT", 1u16),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_duration_secs() {
        set("PLATFORM_TEST_TTL", "1800");
        assert_eq!(
            duration_secs("PLATFORM_TEST_TTL", Duration::from_secs(1)),
            Ok(Duration::from_secs(1800))
        );
        set("PLATFORM_TEST_TTL_ZERO", "0");
        assert!(duration_secs("PLATFORM_TEST_TTL_ZERO", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_flag_and_list() {
        set("PLATFORM_TEST_FLAG", "Yes");
        assert_eq!(flag("PLATFORM_TEST_FLAG", false), Ok(true));
        assert_eq!(flag("PLATFORM_TEST_FLAG_UNSET", true), Ok(true));

        set("PLATFORM_TEST_LIST", "http://a, ,http://b");
        assert_eq!(list("PLATFORM_TEST_LIST"), vec!["http://a", "http://b"]);
    }
}
