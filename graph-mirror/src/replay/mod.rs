//! Replay host.
//!
//! Drives a [`SearchMirror`] from newline-delimited JSON
//! [`TransactionRecord`]s, one committed transaction per line.

use graph_mirror_shared::TransactionRecord;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::dispatcher::DispatchMode;
use crate::extension::SearchMirror;
use crate::MirrorError;

/// Counters for one replay run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records translated.
    pub transactions: usize,
    /// Actions across all translated batches.
    pub actions: usize,
    /// Lines that were not valid transaction records.
    pub skipped_lines: usize,
    /// Synchronous dispatches that returned an error, or background tasks
    /// that did not finish. Background failures reported by the cluster go
    /// to the dispatcher's listener instead.
    pub failed_dispatches: usize,
}

/// Replay every record from `reader` through `mirror`.
///
/// In asynchronous mode, all spawned dispatches are awaited before returning.
pub async fn replay<R>(
    reader: R,
    mirror: &SearchMirror,
    mode: DispatchMode,
) -> Result<ReplaySummary, MirrorError>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReplaySummary::default();
    let mut pending = Vec::new();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let record: TransactionRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_number, error = %e, "Skipping malformed transaction record");
                summary.skipped_lines += 1;
                continue;
            }
        };

        let batch = mirror.before_commit(&record);
        summary.transactions += 1;
        summary.actions += batch.len();
        debug!(line = line_number, actions = batch.len(), "Replaying transaction");

        match mode {
            DispatchMode::Asynchronous => {
                if let Some(handle) = mirror.after_commit(&record, batch) {
                    pending.push(handle);
                }
            }
            DispatchMode::Synchronous => {
                if let Err(e) = mirror.dispatch(batch, mode).await {
                    warn!(line = line_number, error = %e, "Synchronous dispatch failed");
                    summary.failed_dispatches += 1;
                }
            }
        }
    }

    for handle in pending {
        if let Err(e) = handle.await {
            warn!(error = %e, "Dispatch task did not complete");
            summary.failed_dispatches += 1;
        }
    }

    info!(
        transactions = summary.transactions,
        actions = summary.actions,
        skipped_lines = summary.skipped_lines,
        failed_dispatches = summary.failed_dispatches,
        "Replay finished"
    );
    Ok(summary)
}
