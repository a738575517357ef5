//! Index spec language.
//!
//! A compact textual mapping from graph labels to search indices, e.g.
//! `people:Person(name,age),companies:Company(name)`.

mod parser;

pub use parser::parse_index_spec;
