//! Search index error types.
//!
//! This module defines the unified error type for all search index operations,
//! covering client construction, transport failures and cluster-side rejections.

use thiserror::Error;

/// Unified errors from search index operations.
///
/// Used by the `SearchIndexProvider` trait and its implementations. Item-level
/// failures inside a successful bulk response are not errors at this level;
/// they are reported through `BatchOperationSummary`.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Invalid input (e.g., malformed URL, empty credentials).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to establish connection to the search index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The bulk request could not be sent or no response was received.
    #[error("Bulk request error: {0}")]
    BulkRequestError(String),

    /// The cluster answered the request with a non-success HTTP status.
    #[error("Cluster error (status {status}): {body}")]
    ClusterError { status: u16, body: String },

    /// Failed to parse response from search index backend.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchIndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk request error.
    pub fn bulk_request(msg: impl Into<String>) -> Self {
        Self::BulkRequestError(msg.into())
    }

    /// Create a cluster error from a response status and body.
    pub fn cluster(status: u16, body: impl Into<String>) -> Self {
        Self::ClusterError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SearchIndexError::connection("refused").to_string(),
            "Connection error: refused"
        );
        assert_eq!(
            SearchIndexError::cluster(503, "unavailable").to_string(),
            "Cluster error (status 503): unavailable"
        );
    }

    #[test]
    fn test_constructors_pick_variant() {
        assert!(matches!(
            SearchIndexError::validation("x"),
            SearchIndexError::ValidationError(_)
        ));
        assert!(matches!(
            SearchIndexError::bulk_request("x"),
            SearchIndexError::BulkRequestError(_)
        ));
        assert!(matches!(
            SearchIndexError::cluster(400, "x"),
            SearchIndexError::ClusterError { status: 400, .. }
        ));
        assert!(matches!(
            SearchIndexError::parse("x"),
            SearchIndexError::ParseError(_)
        ));
    }
}
