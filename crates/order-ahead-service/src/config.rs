//! Configuration for the order-ahead service.
//!
//! Layers, lowest precedence first:
//! - built-in defaults
//! - an optional TOML file
//! - environment variables:
//!   - `ORDER_AHEAD_API_URL`      (default: "http://127.0.0.1:8080")
//!   - `ORDER_AHEAD_FEED_URL`     (default: unset, no live feed)
//!   - `ORDER_AHEAD_COMPANY_OID`
//!   - `ORDER_AHEAD_LOCATION_OID`
//!   - `ORDER_AHEAD_TOKEN`
//!   - `ORDER_AHEAD_TICK_MS`      (default: "1000")
//!   - `ORDER_AHEAD_TIMEOUT_SECS` (default: "10")
//!
//! CLI flags in the binaries are applied on top.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Paths of the order API routes, relative to `api_base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Routes {
    pub get_active_orders: String,
    pub set_order_expired: String,
    pub process_order: String,
    pub clear_order: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            get_active_orders: "/orderAhead/getActiveOrders".to_string(),
            set_order_expired: "/orderAhead/setOrderToIsExpired".to_string(),
            process_order: "/orderAhead/processActiveOrder".to_string(),
            clear_order: "/orderAhead/clearActiveOrder".to_string(),
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the order API, without a trailing slash.
    pub api_base_url: String,

    /// Websocket URL pushing new orders. No live feed when unset.
    pub feed_url: Option<String>,

    pub company_oid: String,
    pub location_oid: String,

    /// Sent as a bearer token when present.
    pub auth_token: Option<String>,

    pub tick_interval_ms: u64,
    pub request_timeout_secs: u64,

    pub routes: Routes,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".to_string(),
            feed_url: None,
            company_oid: String::new(),
            location_oid: String::new(),
            auth_token: None,
            tick_interval_ms: 1000,
            request_timeout_secs: 10,
            routes: Routes::default(),
        }
    }
}

impl ServiceConfig {
    /// Defaults, overlaid with `path` if given, overlaid with the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply overrides from a variable lookup (the environment in
    /// production, a map in tests).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ORDER_AHEAD_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("ORDER_AHEAD_FEED_URL") {
            self.feed_url = Some(v);
        }
        if let Some(v) = lookup("ORDER_AHEAD_COMPANY_OID") {
            self.company_oid = v;
        }
        if let Some(v) = lookup("ORDER_AHEAD_LOCATION_OID") {
            self.location_oid = v;
        }
        if let Some(v) = lookup("ORDER_AHEAD_TOKEN") {
            self.auth_token = Some(v);
        }
        self.tick_interval_ms =
            read_or_default(&lookup, "ORDER_AHEAD_TICK_MS", self.tick_interval_ms)?;
        self.request_timeout_secs =
            read_or_default(&lookup, "ORDER_AHEAD_TIMEOUT_SECS", self.request_timeout_secs)?;

        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Convenience: absolute URL of a route path.
    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.api_base_url, route)
    }
}

fn read_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnv { key, value: val }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert!(config.feed_url.is_none());
        assert_eq!(
            config.url_for(&config.routes.get_active_orders),
            "http://127.0.0.1:8080/orderAhead/getActiveOrders"
        );
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_base_url = "https://file.example"
company_oid = "c-file"
location_oid = "l-file"
tick_interval_ms = 500

[routes]
clear_order = "/v2/clear"
"#
        )
        .unwrap();

        let mut config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.routes.clear_order, "/v2/clear");
        assert_eq!(config.routes.process_order, Routes::default().process_order);

        config
            .apply_env_with(lookup_from(&[
                ("ORDER_AHEAD_API_URL", "https://env.example/"),
                ("ORDER_AHEAD_COMPANY_OID", "c-env"),
            ]))
            .unwrap();

        assert_eq!(config.api_base_url, "https://env.example");
        assert_eq!(config.company_oid, "c-env");
        assert_eq!(config.location_oid, "l-file");
        assert_eq!(config.tick_interval_ms, 500);
    }

    #[test]
    fn bad_env_number_is_reported() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env_with(lookup_from(&[("ORDER_AHEAD_TICK_MS", "fast")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "ORDER_AHEAD_TICK_MS", .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServiceConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
