//! This module defines the core data structures used across the graph mirror.
//! It re-exports the projection, action, batch and record types.

pub mod batch;
pub mod index_spec;
pub mod pending_action;
pub mod transaction_record;

pub use batch::Batch;
pub use index_spec::{IndexSettings, IndexSpec, LabelMapping};
pub use pending_action::{ActionKind, Document, DocumentKey, PendingAction};
pub use transaction_record::{LabelEntry, NodeRecord, PropertyEntry, TransactionRecord};
