//! Environment configuration.
//!
//! | Variable      | Default   |
//! |---------------|-----------|
//! | `HOST`        | `0.0.0.0` |
//! | `PORT`        | `3000`    |
//! | `MONGODB_URI` | unset     |
//! | `SENTRY_DSN`  | unset     |
//! | `LOG_FORMAT`  | `text`    |
//!
//! `RUST_LOG` is read by the subscriber directly.

use crate::error::{BackendError, Result};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: Option<String>,
    pub sentry_dsn: Option<String>,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mongodb_uri: None,
            sentry_dsn: None,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source. Blank values count
    /// as unset.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] when `PORT` is not a port number or
    /// `LOG_FORMAT` is neither `text` nor `json`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| BackendError::Config(format!("PORT={raw}: {e}")))?,
            None => DEFAULT_PORT,
        };

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(BackendError::Config(format!(
                    "LOG_FORMAT={other}: expected text or json"
                )))
            }
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            mongodb_uri: var("MONGODB_URI"),
            sentry_dsn: var("SENTRY_DSN"),
            log_format,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("MONGODB_URI", "mongodb://db:27017/app"),
            ("SENTRY_DSN", "https://key@o1.ingest.sentry.io/2"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.mongodb_uri.as_deref(), Some("mongodb://db:27017/app"));
        assert!(config.sentry_dsn.is_some());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_uri_is_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("MONGODB_URI", "  ")])).unwrap();
        assert!(config.mongodb_uri.is_none());
    }

    #[test]
    fn rejects_bad_port_and_format() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));

        let err = ServerConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT=xml"));
    }
}
