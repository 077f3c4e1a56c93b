//! Service configuration
//!
//! Read once from environment variables at startup. Missing or invalid
//! values fall back to defaults with a log line.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};

use crate::market::etsy::DEFAULT_API_BASE;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub allowed_origin: String,
    pub etsy_api_base: String,
    pub etsy_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            bind: var("MARKETLENS_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: try_load("MARKETLENS_PORT", DEFAULT_PORT),
            database_path: var("MARKETLENS_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            allowed_origin: var("MARKETLENS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string()),
            etsy_api_base: var("ETSY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            etsy_api_key: var("ETSY_KEYSTRING").or_else(|| {
                warn!("ETSY_KEYSTRING not set, market search will use simulated data");
                None
            }),
        }
    }

    /// Socket address string to bind the HTTP listener to
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Non-empty environment variable
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value '{raw}': {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// `<project root>/data/marketlens.db`, where the project root is found by
/// walking up from `target/{debug,release}` when running from cargo.
fn default_database_path() -> PathBuf {
    let mut path = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("marketlens.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_falls_back_on_invalid() {
        env::set_var("MARKETLENS_TEST_PORT_BAD", "eighty");
        assert_eq!(try_load("MARKETLENS_TEST_PORT_BAD", 8000u16), 8000);

        env::set_var("MARKETLENS_TEST_PORT_OK", " 9001 ");
        assert_eq!(try_load("MARKETLENS_TEST_PORT_OK", 8000u16), 9001);

        assert_eq!(try_load("MARKETLENS_TEST_PORT_UNSET", 7u16), 7);
    }

    #[test]
    fn test_blank_var_is_unset() {
        env::set_var("MARKETLENS_TEST_BLANK", "   ");
        assert_eq!(var("MARKETLENS_TEST_BLANK"), None);
    }

    #[test]
    fn test_default_database_path() {
        let path = default_database_path();
        assert!(path.ends_with("data/marketlens.db"));
    }

    #[test]
    fn test_address() {
        let config = Config {
            bind: "127.0.0.1".to_string(),
            port: 8123,
            database_path: PathBuf::from("test.db"),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            etsy_api_base: DEFAULT_API_BASE.to_string(),
            etsy_api_key: None,
        };
        assert_eq!(config.address(), "127.0.0.1:8123");
    }
}
