//! # Graph Mirror
//!
//! Mirrors mutations committed against a property graph into OpenSearch
//! indices.
//!
//! ## Architecture
//!
//! A host drives the mirror through two phases per transaction:
//!
//! 1. **Translate** (before commit): the transaction's mutations become a
//!    [`Batch`](graph_mirror_shared::Batch) with at most one action per
//!    (index, document id). No I/O happens here.
//! 2. **Dispatch** (after commit): the batch is sent as one bulk request,
//!    in the background or awaited with a timeout.
//!
//! ## Modules
//!
//! - [`spec`]: Parser for the `index:Label(prop,...)` mapping language
//! - [`projector`]: Builds documents from entities
//! - [`translator`]: Turns a transaction into a deduplicated batch
//! - [`dispatcher`]: Sends batches to the search cluster
//! - [`extension`]: Host-facing facade and shared settings
//! - [`replay`]: Reference host reading transactions as NDJSON
//! - [`config`]: Configuration and dependency initialization
//! - [`errors`]: Error types for the mirror

pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod extension;
pub mod projector;
pub mod replay;
pub mod spec;
pub mod translator;

pub use config::{Dependencies, MirrorConfig};
pub use dispatcher::{BatchDispatcher, DispatchMode, DispatchOutcome};
pub use errors::{DispatchError, SpecParseError};
pub use extension::SearchMirror;
pub use translator::MutationTranslator;

use thiserror::Error;

/// Errors that can occur during mirror initialization or execution.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The index spec maps nothing; the mirror must stay off.
    #[error("Graph mirror disabled: {0}")]
    Disabled(String),

    /// The index spec is ambiguous.
    #[error("Index spec error: {0}")]
    SpecError(#[from] SpecParseError),

    /// Dispatch error.
    #[error("Dispatch error: {0}")]
    DispatchError(#[from] DispatchError),

    /// Reading transaction input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MirrorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
