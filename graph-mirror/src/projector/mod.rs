//! Document projection.
//!
//! Builds the JSON document sent for an entity under one [`IndexSpec`]:
//! `id`, then `labels` (each only when enabled in the settings), then every
//! projected property the entity carries, in declared order. Missing
//! properties are omitted, never written as `null`.

use graph_mirror_shared::{Document, GraphEntity, IndexSettings, IndexSpec};
use serde_json::Value;

/// Field holding the entity's stable identity.
pub const ID_FIELD: &str = "id";

/// Field holding the entity's current labels.
pub const LABELS_FIELD: &str = "labels";

/// Full document for an index action.
pub fn project<E: GraphEntity>(entity: &E, spec: &IndexSpec, settings: &IndexSettings) -> Document {
    let mut document = Document::new();

    if settings.include_id_field() {
        document.insert(ID_FIELD.to_string(), Value::String(entity.id()));
    }
    if settings.include_labels_field() {
        let labels = entity.labels().into_iter().map(Value::String).collect();
        document.insert(LABELS_FIELD.to_string(), Value::Array(labels));
    }
    for property in spec.properties() {
        if let Some(value) = entity.property(property) {
            document.insert(property.clone(), value);
        }
    }

    document
}

/// Partial document for an update action.
///
/// Holds the same fields as [`project`]: only properties currently present
/// are written, so a removed property simply stops being sent.
pub fn project_partial<E: GraphEntity>(
    entity: &E,
    spec: &IndexSpec,
    settings: &IndexSettings,
) -> Document {
    project(entity, spec, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_mirror_shared::{LabelMapping, NodeRecord};
    use serde_json::json;

    fn settings(include_id: bool, include_labels: bool) -> IndexSettings {
        IndexSettings::new(LabelMapping::new(), include_id, include_labels)
    }

    #[test]
    fn test_project_full_document() {
        let node = NodeRecord::new(7)
            .with_label("Person")
            .with_property("name", "Ann")
            .with_property("age", 41)
            .with_property("secret", "hidden");
        let spec = IndexSpec::new("people", ["name", "age"]);

        let document = project(&node, &spec, &settings(true, true));

        assert_eq!(
            Value::Object(document),
            json!({"id": "7", "labels": ["Person"], "name": "Ann", "age": 41})
        );
    }

    #[test]
    fn test_field_order() {
        let node = NodeRecord::new(1)
            .with_label("B")
            .with_label("A")
            .with_property("age", 3)
            .with_property("name", "x");
        let spec = IndexSpec::new("idx", ["name", "age"]);

        let document = project(&node, &spec, &settings(true, true));
        let keys: Vec<&str> = document.keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["id", "labels", "name", "age"]);
        assert_eq!(document["labels"], json!(["B", "A"]));
    }

    #[test]
    fn test_flags_disable_metadata() {
        let node = NodeRecord::new(1).with_label("Person").with_property("name", "Ann");
        let spec = IndexSpec::new("people", ["name"]);

        let document = project(&node, &spec, &settings(false, false));
        assert_eq!(Value::Object(document), json!({"name": "Ann"}));

        let document = project(&node, &spec, &settings(true, false));
        assert_eq!(Value::Object(document), json!({"id": "1", "name": "Ann"}));
    }

    #[test]
    fn test_missing_properties_omitted() {
        let node = NodeRecord::new(2).with_property("name", "Bob");
        let spec = IndexSpec::new("people", ["name", "age"]);

        let document = project_partial(&node, &spec, &settings(false, false));
        assert!(!document.contains_key("age"));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let node = NodeRecord::new(3)
            .with_property("tags", json!(["a", "b"]))
            .with_property("score", 1.5)
            .with_property("active", true);
        let spec = IndexSpec::new("idx", ["tags", "score", "active"]);

        let document = project(&node, &spec, &settings(false, false));
        assert_eq!(
            Value::Object(document),
            json!({"tags": ["a", "b"], "score": 1.5, "active": true})
        );
    }
}
