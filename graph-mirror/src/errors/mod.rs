//! Error types for the graph mirror.

use std::time::Duration;

use graph_mirror_repository::SearchIndexError;
use thiserror::Error;

/// Errors raised while parsing the index spec language.
///
/// Malformed clauses are skipped rather than reported; only conditions that
/// make the whole mapping ambiguous are errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecParseError {
    /// A label is mapped by more than one clause.
    #[error("Label `{label}` is defined twice (clause `{clause}`)")]
    DuplicateLabel { label: String, clause: String },
}

impl SpecParseError {
    /// Create a duplicate label error for the offending clause.
    pub fn duplicate_label(label: impl Into<String>, clause: impl Into<String>) -> Self {
        Self::DuplicateLabel {
            label: label.into(),
            clause: clause.into(),
        }
    }
}

/// Errors that can occur while dispatching a batch to the search cluster.
#[derive(Error, Debug, Clone)]
pub enum DispatchError {
    /// The bulk request failed as a whole.
    #[error("Transport error: {0}")]
    Transport(#[from] SearchIndexError),

    /// The cluster answered but rejected some of the actions.
    #[error("Cluster rejected {failed} of {total} actions: {message}")]
    Rejected {
        failed: usize,
        total: usize,
        message: String,
    },

    /// No response within the synchronous dispatch timeout.
    #[error("Dispatch timed out after {0:?}")]
    TimedOut(Duration),
}
