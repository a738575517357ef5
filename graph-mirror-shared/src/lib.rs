//! # Graph Mirror Shared
//!
//! This crate defines the data structures shared across the graph mirror
//! ecosystem: index projections parsed from the spec language, the pending
//! document actions produced per transaction, and the host-neutral traits a
//! graph engine implements to hand its mutations over for translation.

pub mod graph;
pub mod types;

pub use graph::{GraphEntity, TransactionDelta};
pub use types::batch::Batch;
pub use types::index_spec::{IndexSettings, IndexSpec, LabelMapping};
pub use types::pending_action::{ActionKind, Document, DocumentKey, PendingAction};
pub use types::transaction_record::{LabelEntry, NodeRecord, PropertyEntry, TransactionRecord};
