//! Document actions awaiting submission to the search cluster.

use std::fmt;

use serde_json::{Map, Value};

/// JSON document sent to the search index. Field order is insertion order.
pub type Document = Map<String, Value>;

/// Deduplication key of a pending action.
///
/// The type name is deliberately not part of the key: two labels writing the
/// same entity into the same index collapse into one action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub index: String,
    pub id: String,
}

impl DocumentKey {
    pub fn new(index: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.id)
    }
}

/// Kind of bulk operation an action maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Index,
    Update,
    Delete,
}

impl ActionKind {
    /// Name of the bulk API operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn from_bulk_op(op: &str) -> Option<Self> {
        match op {
            "index" | "create" => Some(Self::Index),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document action produced by translating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Full document (re)index, replacing any existing document.
    Index {
        index: String,
        type_name: String,
        id: String,
        document: Document,
    },
    /// Partial document merged into an existing document.
    Update {
        index: String,
        type_name: String,
        id: String,
        document: Document,
    },
    /// Removal of the document.
    Delete {
        index: String,
        type_name: String,
        id: String,
    },
}

impl PendingAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Index { .. } => ActionKind::Index,
            Self::Update { .. } => ActionKind::Update,
            Self::Delete { .. } => ActionKind::Delete,
        }
    }

    pub fn index_name(&self) -> &str {
        match self {
            Self::Index { index, .. } | Self::Update { index, .. } | Self::Delete { index, .. } => {
                index
            }
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Index { type_name, .. }
            | Self::Update { type_name, .. }
            | Self::Delete { type_name, .. } => type_name,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Index { id, .. } | Self::Update { id, .. } | Self::Delete { id, .. } => id,
        }
    }

    /// Document payload; `None` for deletes.
    pub fn document(&self) -> Option<&Document> {
        match self {
            Self::Index { document, .. } | Self::Update { document, .. } => Some(document),
            Self::Delete { .. } => None,
        }
    }

    pub fn key(&self) -> DocumentKey {
        DocumentKey::new(self.index_name(), self.id())
    }
}
