//! The deduplicated set of actions translated from one transaction.

use std::collections::btree_map::{self, BTreeMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::pending_action::{ActionKind, DocumentKey, PendingAction};

/// Pending actions of one transaction, at most one per [`DocumentKey`].
///
/// Inserting an action for a key that is already present replaces the earlier
/// action. Iteration follows key order, which keeps bulk payloads stable.
#[derive(Debug, Clone)]
pub struct Batch {
    id: Uuid,
    translated_at: DateTime<Utc>,
    actions: BTreeMap<DocumentKey, PendingAction>,
}

impl Batch {
    /// Create an empty batch with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            translated_at: Utc::now(),
            actions: BTreeMap::new(),
        }
    }

    /// Random id used to correlate translation and dispatch logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn translated_at(&self) -> DateTime<Utc> {
        self.translated_at
    }

    /// Insert an action, returning the action it replaced, if any.
    pub fn insert(&mut self, action: PendingAction) -> Option<PendingAction> {
        self.actions.insert(action.key(), action)
    }

    pub fn get(&self, key: &DocumentKey) -> Option<&PendingAction> {
        self.actions.get(key)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> impl Iterator<Item = &PendingAction> {
        self.actions.values()
    }

    /// Number of actions of the given kind.
    pub fn count(&self, kind: ActionKind) -> usize {
        self.actions().filter(|a| a.kind() == kind).count()
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for Batch {
    type Item = PendingAction;
    type IntoIter = btree_map::IntoValues<DocumentKey, PendingAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_values()
    }
}
