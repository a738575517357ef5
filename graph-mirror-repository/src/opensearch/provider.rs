//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use graph_mirror_shared::Batch;
use opensearch::{
    auth::Credentials,
    cert::CertificateValidation,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ConnectionConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::bulk::{bulk_lines, parse_bulk_response};
use crate::types::BatchOperationSummary;

/// OpenSearch provider implementation.
///
/// Submits translated batches through the `_bulk` endpoint of a single node.
///
/// # Example
///
/// ```ignore
/// use graph_mirror_repository::{ConnectionConfig, OpenSearchProvider, SearchIndexProvider};
///
/// let provider = OpenSearchProvider::new(&ConnectionConfig::new("http://localhost:9200")).await?;
/// provider.ping().await?;
/// let summary = provider.bulk(&batch).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider for the configured cluster.
    ///
    /// No request is sent; use [`SearchIndexProvider::ping`] to check connectivity.
    ///
    /// # Arguments
    ///
    /// * `config` - URL, credentials and TLS options of the cluster
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If the URL is invalid or the transport cannot be built
    pub async fn new(config: &ConnectionConfig) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| SearchIndexError::validation(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();

        if let Some((username, password)) = config.credentials() {
            builder = builder.auth(Credentials::Basic(username.to_string(), password.to_string()));
        }
        if config.accept_invalid_certs {
            warn!(url = %config.url, "TLS certificate validation is disabled");
            builder = builder.cert_validation(CertificateValidation::None);
        }
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            authenticated = config.credentials().is_some(),
            "Created OpenSearch provider"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::cluster(status.as_u16(), body));
        }
        Ok(())
    }

    /// Send the batch as one `_bulk` request.
    ///
    /// An empty batch is answered locally with an empty summary.
    async fn bulk(&self, batch: &Batch) -> Result<BatchOperationSummary, SearchIndexError> {
        if batch.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        let body: Vec<JsonBody<Value>> = bulk_lines(batch).into_iter().map(JsonBody::from).collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_request(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                batch_id = %batch.id(),
                status = %status,
                body = %error_body,
                "Bulk request failed"
            );
            return Err(SearchIndexError::cluster(status.as_u16(), error_body));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;
        let summary = parse_bulk_response(&json)?;

        debug!(
            batch_id = %batch.id(),
            total = summary.total,
            failed = summary.failed,
            took_ms = summary.took_ms,
            "Bulk request completed"
        );
        Ok(summary)
    }
}
