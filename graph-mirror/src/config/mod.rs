//! Configuration for the graph mirror.
//!
//! All settings come from environment variables, optionally loaded from a
//! `.env` file by the binary.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;
use std::time::Duration;

use graph_mirror_repository::ConnectionConfig;
use tracing::warn;

use crate::dispatcher::{DispatchMode, DEFAULT_DISPATCH_TIMEOUT};
use crate::MirrorError;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection until successful.
    #[default]
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode, defaulting to `Retry` on unknown values.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!(value = %value, "Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Index spec text; `None` leaves mirroring disabled.
    pub index_spec: Option<String>,
    pub include_id_field: bool,
    pub include_labels_field: bool,
    pub dispatch_mode: DispatchMode,
    /// Bound on a synchronous dispatch.
    pub dispatch_timeout: Duration,
    pub connection: ConnectionConfig,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            index_spec: None,
            include_id_field: true,
            include_labels_field: true,
            dispatch_mode: DispatchMode::default(),
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            connection: ConnectionConfig::default(),
            connection_mode: ConnectionMode::default(),
            retry_interval: Duration::from_secs(DEFAULT_RETRY_INTERVAL_SECS),
        }
    }
}

impl MirrorConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `MIRROR_INDEX_SPEC`: label to index mapping, e.g. `people:Person(name,age)`
    /// - `MIRROR_INCLUDE_ID_FIELD`: add the `id` field to documents (default: true)
    /// - `MIRROR_INCLUDE_LABELS_FIELD`: add the `labels` field to documents (default: true)
    /// - `MIRROR_DISPATCH_MODE`: "sync" or "async" (default: async)
    /// - `MIRROR_DISPATCH_TIMEOUT_SECS`: synchronous dispatch timeout (default: 30)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_USERNAME` / `OPENSEARCH_PASSWORD`: basic auth credentials
    /// - `OPENSEARCH_ACCEPT_INVALID_CERTS`: skip TLS certificate validation (default: false)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: retry interval in seconds (default: 15)
    pub fn from_env() -> Result<Self, MirrorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MirrorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut connection = ConnectionConfig::default();
        if let Some(url) = var("OPENSEARCH_URL") {
            connection.url = url;
        }
        connection.username = var("OPENSEARCH_USERNAME");
        connection.password = var("OPENSEARCH_PASSWORD");
        connection.accept_invalid_certs = parse_or(
            "OPENSEARCH_ACCEPT_INVALID_CERTS",
            var("OPENSEARCH_ACCEPT_INVALID_CERTS"),
            false,
            parse_bool,
        )?;

        Ok(Self {
            index_spec: var("MIRROR_INDEX_SPEC"),
            include_id_field: parse_or(
                "MIRROR_INCLUDE_ID_FIELD",
                var("MIRROR_INCLUDE_ID_FIELD"),
                defaults.include_id_field,
                parse_bool,
            )?,
            include_labels_field: parse_or(
                "MIRROR_INCLUDE_LABELS_FIELD",
                var("MIRROR_INCLUDE_LABELS_FIELD"),
                defaults.include_labels_field,
                parse_bool,
            )?,
            dispatch_mode: var("MIRROR_DISPATCH_MODE")
                .map(|v| DispatchMode::from_str(&v))
                .transpose()?
                .unwrap_or(defaults.dispatch_mode),
            dispatch_timeout: parse_or(
                "MIRROR_DISPATCH_TIMEOUT_SECS",
                var("MIRROR_DISPATCH_TIMEOUT_SECS"),
                defaults.dispatch_timeout,
                parse_secs,
            )?,
            connection,
            connection_mode: var("OPENSEARCH_CONNECTION_MODE")
                .map(|v| ConnectionMode::parse(&v))
                .unwrap_or(defaults.connection_mode),
            retry_interval: parse_or(
                "OPENSEARCH_RETRY_INTERVAL_SECS",
                var("OPENSEARCH_RETRY_INTERVAL_SECS"),
                defaults.retry_interval,
                parse_secs,
            )?,
        })
    }
}

fn parse_or<T>(
    key: &str,
    value: Option<String>,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> Result<T, MirrorError> {
    match value {
        None => Ok(default),
        Some(v) => parse(v.trim())
            .ok_or_else(|| MirrorError::config(format!("Invalid value `{}` for {}", v, key))),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_secs(value: &str) -> Option<Duration> {
    value.parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<MirrorConfig, MirrorError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MirrorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.index_spec, None);
        assert!(config.include_id_field);
        assert!(config.include_labels_field);
        assert_eq!(config.dispatch_mode, DispatchMode::Asynchronous);
        assert_eq!(config.dispatch_timeout, Duration::from_secs(30));
        assert_eq!(config.connection.url, "http://localhost:9200");
        assert!(!config.connection.accept_invalid_certs);
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
        assert_eq!(config.retry_interval, Duration::from_secs(15));
    }

    #[test]
    fn test_all_variables() {
        let config = config(&[
            ("MIRROR_INDEX_SPEC", "people:Person(name)"),
            ("MIRROR_INCLUDE_ID_FIELD", "false"),
            ("MIRROR_INCLUDE_LABELS_FIELD", "0"),
            ("MIRROR_DISPATCH_MODE", "sync"),
            ("MIRROR_DISPATCH_TIMEOUT_SECS", "5"),
            ("OPENSEARCH_URL", "https://search:9200"),
            ("OPENSEARCH_USERNAME", "admin"),
            ("OPENSEARCH_PASSWORD", "secret"),
            ("OPENSEARCH_ACCEPT_INVALID_CERTS", "TRUE"),
            ("OPENSEARCH_CONNECTION_MODE", "fail-fast"),
            ("OPENSEARCH_RETRY_INTERVAL_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(config.index_spec.as_deref(), Some("people:Person(name)"));
        assert!(!config.include_id_field);
        assert!(!config.include_labels_field);
        assert_eq!(config.dispatch_mode, DispatchMode::Synchronous);
        assert_eq!(config.dispatch_timeout, Duration::from_secs(5));
        assert_eq!(config.connection.url, "https://search:9200");
        assert_eq!(config.connection.credentials(), Some(("admin", "secret")));
        assert!(config.connection.accept_invalid_certs);
        assert_eq!(config.connection_mode, ConnectionMode::FailFast);
        assert_eq!(config.retry_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(matches!(
            config(&[("MIRROR_INCLUDE_ID_FIELD", "maybe")]),
            Err(MirrorError::ConfigError(_))
        ));
        assert!(matches!(
            config(&[("MIRROR_DISPATCH_TIMEOUT_SECS", "-1")]),
            Err(MirrorError::ConfigError(_))
        ));
        assert!(matches!(
            config(&[("MIRROR_DISPATCH_MODE", "eventually")]),
            Err(MirrorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config(&[("MIRROR_INDEX_SPEC", "  "), ("MIRROR_INCLUDE_ID_FIELD", "")]).unwrap();
        assert_eq!(config.index_spec, None);
        assert!(config.include_id_field);
    }

    #[test]
    fn test_unknown_connection_mode_defaults_to_retry() {
        let config = config(&[("OPENSEARCH_CONNECTION_MODE", "sometimes")]).unwrap();
        assert_eq!(config.connection_mode, ConnectionMode::Retry);
    }
}
