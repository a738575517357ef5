//! Batch dispatcher.
//!
//! Hands translated batches to a [`SearchIndexProvider`], either spawned on
//! the runtime and reported through a [`DispatchListener`], or awaited with a
//! bounded timeout.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use graph_mirror_repository::{BatchOperationSummary, SearchIndexProvider};
use graph_mirror_shared::Batch;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::DispatchError;
use crate::MirrorError;

/// Default bound on a synchronous dispatch.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How a batch is handed to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Await the cluster's answer, bounded by the dispatch timeout.
    Synchronous,
    /// Fire and forget; the outcome goes to the listener.
    #[default]
    Asynchronous,
}

impl FromStr for DispatchMode {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync" | "synchronous" => Ok(Self::Synchronous),
            "async" | "asynchronous" => Ok(Self::Asynchronous),
            other => Err(MirrorError::config(format!(
                "Invalid dispatch mode `{}`, expected `sync` or `async`",
                other
            ))),
        }
    }
}

/// Identity of a dispatched batch, as reported to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReceipt {
    pub batch_id: Uuid,
    pub action_count: usize,
    pub translated_at: DateTime<Utc>,
}

impl BatchReceipt {
    pub fn of(batch: &Batch) -> Self {
        Self {
            batch_id: batch.id(),
            action_count: batch.len(),
            translated_at: batch.translated_at(),
        }
    }
}

/// Receives the outcome of asynchronously dispatched batches.
///
/// Called from a runtime worker; implementations must not block.
pub trait DispatchListener: Send + Sync {
    /// The cluster answered. Individual items may still have failed.
    fn on_completed(&self, receipt: &BatchReceipt, summary: &BatchOperationSummary);

    /// The request failed as a whole.
    fn on_failed(&self, receipt: &BatchReceipt, error: &DispatchError);
}

/// Listener that only logs outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl DispatchListener for LoggingListener {
    fn on_completed(&self, receipt: &BatchReceipt, summary: &BatchOperationSummary) {
        if let Some(message) = summary.error_message() {
            warn!(
                batch_id = %receipt.batch_id,
                failed = summary.failed,
                total = summary.total,
                errors = %message,
                "Cluster rejected some actions of batch"
            );
        } else {
            debug!(
                batch_id = %receipt.batch_id,
                actions = receipt.action_count,
                took_ms = summary.took_ms,
                "Batch applied"
            );
        }
    }

    fn on_failed(&self, receipt: &BatchReceipt, error: &DispatchError) {
        warn!(
            batch_id = %receipt.batch_id,
            actions = receipt.action_count,
            error = %error,
            "Batch dispatch failed"
        );
    }
}

/// Result of submitting a batch.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Nothing to send.
    Empty,
    /// Running in the background.
    Spawned(JoinHandle<()>),
    /// Applied by the cluster without item errors.
    Completed(BatchOperationSummary),
}

/// Submits batches to a search index provider.
pub struct BatchDispatcher {
    provider: Arc<dyn SearchIndexProvider>,
    listener: Arc<dyn DispatchListener>,
    runtime: Handle,
    timeout: Duration,
}

impl BatchDispatcher {
    /// Create a dispatcher spawning background work on `runtime`.
    pub fn new(provider: Arc<dyn SearchIndexProvider>, runtime: Handle) -> Self {
        Self {
            provider,
            listener: Arc::new(LoggingListener),
            runtime,
            timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn DispatchListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submit a batch in the given mode.
    pub async fn submit(
        &self,
        batch: Batch,
        mode: DispatchMode,
    ) -> Result<DispatchOutcome, DispatchError> {
        if batch.is_empty() {
            return Ok(DispatchOutcome::Empty);
        }
        match mode {
            DispatchMode::Asynchronous => Ok(self
                .spawn(batch)
                .map_or(DispatchOutcome::Empty, DispatchOutcome::Spawned)),
            DispatchMode::Synchronous => self.send(&batch).await.map(DispatchOutcome::Completed),
        }
    }

    /// Send the batch in the background, reporting to the listener.
    ///
    /// Does not need to be called from within the runtime. Returns `None`
    /// for an empty batch.
    pub fn spawn(&self, batch: Batch) -> Option<JoinHandle<()>> {
        if batch.is_empty() {
            return None;
        }

        let provider = Arc::clone(&self.provider);
        let listener = Arc::clone(&self.listener);
        let receipt = BatchReceipt::of(&batch);
        debug!(
            batch_id = %receipt.batch_id,
            actions = receipt.action_count,
            "Spawning batch dispatch"
        );

        Some(self.runtime.spawn(async move {
            match provider.bulk(&batch).await {
                Ok(summary) => listener.on_completed(&receipt, &summary),
                Err(e) => listener.on_failed(&receipt, &DispatchError::from(e)),
            }
        }))
    }

    /// Send the batch and wait for the cluster, up to the dispatch timeout.
    ///
    /// Any item the cluster reports as failed makes the whole call fail with
    /// [`DispatchError::Rejected`].
    #[instrument(skip_all, fields(batch_id = %batch.id(), actions = batch.len()))]
    pub async fn send(&self, batch: &Batch) -> Result<BatchOperationSummary, DispatchError> {
        if batch.is_empty() {
            return Ok(BatchOperationSummary::default());
        }

        let summary = tokio::time::timeout(self.timeout, self.provider.bulk(batch))
            .await
            .map_err(|_| DispatchError::TimedOut(self.timeout))??;

        if let Some(message) = summary.error_message() {
            return Err(DispatchError::Rejected {
                failed: summary.failed,
                total: summary.total,
                message,
            });
        }

        debug!(took_ms = summary.took_ms, "Batch applied");
        Ok(summary)
    }
}
