//! Result types for bulk operations.

use graph_mirror_shared::ActionKind;

/// Result of a single action within a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationResult {
    /// Target index of the action.
    pub index: String,
    /// Document id of the action.
    pub id: String,
    /// Bulk operation the cluster reports for this item.
    pub action: ActionKind,
    /// HTTP status reported for the item.
    pub status: u16,
    /// Whether the cluster applied the action.
    pub success: bool,
    /// Error reported by the cluster, if the action failed.
    pub error: Option<String>,
}

/// Summary of a bulk request containing aggregate statistics and individual results.
///
/// This allows callers to distinguish a request that failed as a whole
/// (an error) from one where the cluster rejected only some of the actions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchOperationSummary {
    /// Total number of items in the response.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Time the cluster reports spending on the request.
    pub took_ms: u64,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Build a summary from per-item results.
    pub fn from_results(results: Vec<BatchOperationResult>, took_ms: u64) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            took_ms,
            results,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.failed > 0
    }

    /// The first few item errors joined into one message, if any item failed.
    pub fn error_message(&self) -> Option<String> {
        const MAX_REPORTED: usize = 3;

        let errors: Vec<String> = self
            .results
            .iter()
            .filter(|r| !r.success)
            .take(MAX_REPORTED)
            .map(|r| {
                format!(
                    "{} {}/{}: {}",
                    r.action,
                    r.index,
                    r.id,
                    r.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();

        if errors.is_empty() {
            return None;
        }
        let mut message = errors.join("; ");
        if self.failed > MAX_REPORTED {
            message.push_str(&format!(" (and {} more)", self.failed - MAX_REPORTED));
        }
        Some(message)
    }
}
