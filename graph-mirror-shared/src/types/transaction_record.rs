//! Serializable in-memory transaction, usable as a host for the translator.
//!
//! A [`TransactionRecord`] holds the post-transaction state of every node it
//! mentions (the last known state for deleted nodes) plus the mutation events,
//! which reference nodes by id. Events pointing at unknown ids are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::{GraphEntity, TransactionDelta};

/// A graph node with its labels and properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl NodeRecord {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl GraphEntity for NodeRecord {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn property(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A label attached to or detached from a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub node: u64,
    pub label: String,
}

/// A property assigned to or removed from a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub node: u64,
    pub key: String,
}

/// The mutations of one transaction.
///
/// # Example
///
/// ```
/// use graph_mirror_shared::{NodeRecord, TransactionDelta, TransactionRecord};
///
/// let record: TransactionRecord = serde_json::from_str(r#"{
///     "nodes": [{"id": 1, "labels": ["Person"], "properties": {"name": "Ann"}}],
///     "created": [1],
///     "assigned_properties": [{"node": 1, "key": "name"}]
/// }"#).unwrap();
///
/// assert_eq!(record.created_entities().len(), 1);
/// assert_eq!(record.property_attach_events().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub created: Vec<u64>,
    #[serde(default)]
    pub deleted: Vec<u64>,
    #[serde(default)]
    pub assigned_labels: Vec<LabelEntry>,
    #[serde(default)]
    pub removed_labels: Vec<LabelEntry>,
    #[serde(default)]
    pub assigned_properties: Vec<PropertyEntry>,
    #[serde(default)]
    pub removed_properties: Vec<PropertyEntry>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: u64) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Insert or replace the recorded state of a node.
    pub fn upsert_node(&mut self, node: NodeRecord) -> &mut Self {
        match self.nodes.iter_mut().find(|n| n.id == node.id) {
            Some(existing) => *existing = node,
            None => self.nodes.push(node),
        }
        self
    }

    pub fn create(&mut self, node: NodeRecord) -> &mut Self {
        self.created.push(node.id);
        self.upsert_node(node)
    }

    /// Mark a node deleted. Its labels are reported as detached, the way
    /// graph engines report the labels of a deleted node.
    pub fn delete(&mut self, node: NodeRecord) -> &mut Self {
        self.deleted.push(node.id);
        for label in &node.labels {
            self.removed_labels.push(LabelEntry {
                node: node.id,
                label: label.clone(),
            });
        }
        self.upsert_node(node)
    }

    pub fn attach_label(&mut self, node: u64, label: impl Into<String>) -> &mut Self {
        self.assigned_labels.push(LabelEntry {
            node,
            label: label.into(),
        });
        self
    }

    pub fn detach_label(&mut self, node: u64, label: impl Into<String>) -> &mut Self {
        self.removed_labels.push(LabelEntry {
            node,
            label: label.into(),
        });
        self
    }

    pub fn set_property(&mut self, node: u64, key: impl Into<String>) -> &mut Self {
        self.assigned_properties.push(PropertyEntry {
            node,
            key: key.into(),
        });
        self
    }

    pub fn remove_property(&mut self, node: u64, key: impl Into<String>) -> &mut Self {
        self.removed_properties.push(PropertyEntry {
            node,
            key: key.into(),
        });
        self
    }

    fn nodes_by_id<'a>(&'a self, ids: &'a [u64]) -> Vec<&'a NodeRecord> {
        ids.iter().filter_map(|id| self.node(*id)).collect()
    }

    fn label_events<'a>(&'a self, entries: &'a [LabelEntry]) -> Vec<(&'a NodeRecord, &'a str)> {
        entries
            .iter()
            .filter_map(|e| self.node(e.node).map(|n| (n, e.label.as_str())))
            .collect()
    }

    fn property_events<'a>(
        &'a self,
        entries: &'a [PropertyEntry],
    ) -> Vec<(&'a NodeRecord, &'a str)> {
        entries
            .iter()
            .filter_map(|e| self.node(e.node).map(|n| (n, e.key.as_str())))
            .collect()
    }
}

impl TransactionDelta for TransactionRecord {
    type Entity = NodeRecord;

    fn created_entities(&self) -> Vec<&NodeRecord> {
        self.nodes_by_id(&self.created)
    }

    fn deleted_entities(&self) -> Vec<&NodeRecord> {
        self.nodes_by_id(&self.deleted)
    }

    fn label_attach_events(&self) -> Vec<(&NodeRecord, &str)> {
        self.label_events(&self.assigned_labels)
    }

    fn label_detach_events(&self) -> Vec<(&NodeRecord, &str)> {
        self.label_events(&self.removed_labels)
    }

    fn property_attach_events(&self) -> Vec<(&NodeRecord, &str)> {
        self.property_events(&self.assigned_properties)
    }

    fn property_detach_events(&self) -> Vec<(&NodeRecord, &str)> {
        self.property_events(&self.removed_properties)
    }

    fn is_marked_deleted(&self, entity: &NodeRecord) -> bool {
        self.deleted.contains(&entity.id)
    }
}
