//! OpenSearch implementation of the search index provider.
//!
//! This module provides the bulk request body builder, the bulk response
//! parser and the `OpenSearchProvider` tying them to the OpenSearch client.

mod bulk;
mod provider;

pub use bulk::{bulk_lines, parse_bulk_response};
pub use provider::OpenSearchProvider;
