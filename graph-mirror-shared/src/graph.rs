//! Host-neutral view of a graph transaction.
//!
//! A graph engine exposes the mutations of one transaction through
//! [`TransactionDelta`]. The translator only ever reads through these traits,
//! so no engine-specific type leaks into the translation core.

use serde_json::Value;

/// An indexable record of the graph (typically a node).
pub trait GraphEntity {
    /// Stable identity of the entity, in string form.
    fn id(&self) -> String;

    /// Labels currently carried by the entity, in the host's order.
    fn labels(&self) -> Vec<String>;

    /// Current value of a property, or `None` when the entity does not carry it.
    fn property(&self, key: &str) -> Option<Value>;

    fn has_property(&self, key: &str) -> bool {
        self.property(key).is_some()
    }

    fn has_label(&self, label: &str) -> bool {
        self.labels().iter().any(|l| l == label)
    }
}

/// The mutations observed within a single transaction, before it commits.
///
/// Entities are borrowed from the delta. The same entity may show up in
/// several categories (created and later property-detached, for instance).
pub trait TransactionDelta {
    type Entity: GraphEntity;

    fn created_entities(&self) -> Vec<&Self::Entity>;

    fn deleted_entities(&self) -> Vec<&Self::Entity>;

    /// Labels attached during the transaction, as `(entity, label)` pairs.
    fn label_attach_events(&self) -> Vec<(&Self::Entity, &str)>;

    /// Labels detached during the transaction, as `(entity, label)` pairs.
    fn label_detach_events(&self) -> Vec<(&Self::Entity, &str)>;

    /// Properties assigned during the transaction, as `(entity, key)` pairs.
    fn property_attach_events(&self) -> Vec<(&Self::Entity, &str)>;

    /// Properties removed during the transaction, as `(entity, key)` pairs.
    fn property_detach_events(&self) -> Vec<(&Self::Entity, &str)>;

    /// Whether the entity is deleted within this same transaction.
    fn is_marked_deleted(&self, entity: &Self::Entity) -> bool;
}
