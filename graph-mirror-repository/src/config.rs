//! Connection settings for the search cluster.

use std::time::Duration;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Settings used to build the OpenSearch transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Cluster URL (e.g., "https://search.internal:9200").
    pub url: String,
    /// Basic-auth username; credentials are only sent when both parts are set.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Skip TLS certificate validation.
    ///
    /// Intended for clusters fronted by self-signed certificates. Leave this
    /// off anywhere the network path is not trusted.
    pub accept_invalid_certs: bool,
    /// Per-request timeout applied by the transport, if any.
    pub request_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OPENSEARCH_URL.to_string(),
            username: None,
            password: None,
            accept_invalid_certs: false,
            request_timeout: None,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given URL with default options.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Basic-auth credentials, when both username and password are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
