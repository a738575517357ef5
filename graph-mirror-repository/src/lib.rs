//! # Graph Mirror Repository
//!
//! This crate provides the search backend boundary of the graph mirror: the
//! `SearchIndexProvider` trait, its error and result types, and a concrete
//! implementation submitting batches through the OpenSearch bulk API.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use config::ConnectionConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use types::{BatchOperationResult, BatchOperationSummary};
