//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use graph_mirror_shared::Batch;

use crate::errors::SearchIndexError;
use crate::types::BatchOperationSummary;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the dispatcher to enable dependency
/// injection and easy testing with mock implementations.
///
/// # Note on Atomicity
///
/// A batch is sent as one network call, but the cluster applies each action
/// independently. Partial failure is therefore reported through the returned
/// `BatchOperationSummary` rather than as an error.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the cluster is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the cluster answered the ping
    /// * `Err(SearchIndexError)` - If the cluster is unreachable or unhealthy
    async fn ping(&self) -> Result<(), SearchIndexError>;

    /// Submit every action of the batch in a single bulk request.
    ///
    /// # Arguments
    ///
    /// * `batch` - The deduplicated actions of one transaction
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOperationSummary)` - Per-action results reported by the cluster
    /// * `Err(SearchIndexError)` - If the request failed as a whole
    async fn bulk(&self, batch: &Batch) -> Result<BatchOperationSummary, SearchIndexError>;
}
