//! Label to index projections.
//!
//! An [`IndexSpec`] says which search index a label is mirrored into and which
//! properties are projected. [`IndexSettings`] groups the specs of every label
//! together with the metadata flags applied to generated documents.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Mapping from label name to the specs projecting that label.
pub type LabelMapping = BTreeMap<String, Vec<IndexSpec>>;

/// Projection of one label into one target index.
///
/// Properties keep the order in which they were declared and never repeat,
/// so generated documents have a predictable field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    index_name: String,
    properties: Vec<String>,
}

impl IndexSpec {
    /// Create a spec. Repeated property names are dropped, keeping the first.
    ///
    /// # Example
    ///
    /// ```
    /// use graph_mirror_shared::IndexSpec;
    ///
    /// let spec = IndexSpec::new("people", ["name", "age", "name"]);
    /// assert_eq!(spec.properties(), ["name", "age"]);
    /// ```
    pub fn new<I, S>(index_name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for property in properties {
            let property = property.into();
            if !ordered.contains(&property) {
                ordered.push(property);
            }
        }
        Self {
            index_name: index_name.into(),
            properties: ordered,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.index_name, self.properties.join(","))
    }
}

/// Read-only projection settings shared by every translation.
///
/// Settings are never mutated in place: the `with_*` methods consume the value
/// and return a new one, which callers publish as a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct IndexSettings {
    by_label: LabelMapping,
    include_id_field: bool,
    include_labels_field: bool,
}

impl IndexSettings {
    pub fn new(by_label: LabelMapping, include_id_field: bool, include_labels_field: bool) -> Self {
        Self {
            by_label,
            include_id_field,
            include_labels_field,
        }
    }

    /// Specs projecting `label`; empty when the label is not indexed.
    pub fn specs_for(&self, label: &str) -> &[IndexSpec] {
        self.by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_indexed(&self, label: &str) -> bool {
        !self.specs_for(label).is_empty()
    }

    /// True when no label is mapped, i.e. mirroring is effectively off.
    pub fn is_empty(&self) -> bool {
        self.by_label.values().all(Vec::is_empty)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.by_label.keys().map(String::as_str)
    }

    pub fn mapping(&self) -> &LabelMapping {
        &self.by_label
    }

    pub fn include_id_field(&self) -> bool {
        self.include_id_field
    }

    pub fn include_labels_field(&self) -> bool {
        self.include_labels_field
    }

    pub fn with_include_id_field(mut self, include: bool) -> Self {
        self.include_id_field = include;
        self
    }

    pub fn with_include_labels_field(mut self, include: bool) -> Self {
        self.include_labels_field = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> LabelMapping {
        let mut mapping = LabelMapping::new();
        mapping.insert(
            "Person".to_string(),
            vec![IndexSpec::new("people", ["name", "age"])],
        );
        mapping.insert(
            "Company".to_string(),
            vec![
                IndexSpec::new("companies", ["name"]),
                IndexSpec::new("directory", ["name", "country"]),
            ],
        );
        mapping
    }

    #[test]
    fn test_spec_keeps_declared_order() {
        let spec = IndexSpec::new("idx", ["zeta", "alpha", "zeta", "mid"]);
        assert_eq!(spec.properties(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_spec_display() {
        let spec = IndexSpec::new("my_index", ["name", "age"]);
        assert_eq!(spec.to_string(), "my_index(name,age)");
    }

    #[test]
    fn test_specs_for_label() {
        let settings = IndexSettings::new(mapping(), true, true);
        assert_eq!(settings.specs_for("Person").len(), 1);
        assert_eq!(settings.specs_for("Company").len(), 2);
        assert!(settings.specs_for("Unknown").is_empty());
        assert!(settings.is_indexed("Company"));
        assert!(!settings.is_indexed("Unknown"));
    }

    #[test]
    fn test_empty_settings() {
        assert!(IndexSettings::default().is_empty());
        assert!(!IndexSettings::new(mapping(), false, false).is_empty());
    }

    #[test]
    fn test_with_flags_builds_new_value() {
        let original = IndexSettings::new(mapping(), true, true);
        let toggled = original.clone().with_include_id_field(false);

        assert!(original.include_id_field());
        assert!(!toggled.include_id_field());
        assert!(toggled.include_labels_field());
        assert_eq!(original.mapping(), toggled.mapping());
    }
}
