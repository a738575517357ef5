//! Shared projection settings.

use std::sync::{Arc, PoisonError, RwLock};

use graph_mirror_shared::IndexSettings;
use tracing::{error, info};

use crate::config::MirrorConfig;
use crate::spec::parse_index_spec;
use crate::MirrorError;

/// Atomically replaceable settings snapshot.
///
/// Readers get an `Arc` to an immutable [`IndexSettings`]; writers publish a
/// new value. A translation keeps the snapshot it started with.
#[derive(Debug, Default)]
pub struct SettingsHandle {
    current: RwLock<Arc<IndexSettings>>,
}

impl SettingsHandle {
    pub fn new(settings: IndexSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// The settings currently in effect.
    pub fn snapshot(&self) -> Arc<IndexSettings> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish `settings` for subsequent translations.
    pub fn replace(&self, settings: IndexSettings) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(settings);
    }

    /// Derive new settings from the current ones and publish them.
    ///
    /// Holds the write lock while `f` runs, so concurrent updates are not lost.
    pub fn update(&self, f: impl FnOnce(&IndexSettings) -> IndexSettings) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let next = f(&guard);
        *guard = Arc::new(next);
    }
}

/// Build projection settings from configuration.
///
/// # Returns
///
/// * `Ok(IndexSettings)` - At least one label is mapped
/// * `Err(MirrorError::SpecError)` - The spec maps a label twice
/// * `Err(MirrorError::Disabled)` - No valid clause; mirroring must stay off
pub fn load_settings(config: &MirrorConfig) -> Result<IndexSettings, MirrorError> {
    let mapping = parse_index_spec(config.index_spec.as_deref()).inspect_err(|e| {
        error!(error = %e, "Invalid index spec, graph mirror disabled");
    })?;

    let settings = IndexSettings::new(
        mapping,
        config.include_id_field,
        config.include_labels_field,
    );

    if settings.is_empty() {
        error!(
            spec = config.index_spec.as_deref().unwrap_or_default(),
            "Index spec maps no label, graph mirror disabled"
        );
        return Err(MirrorError::Disabled(
            "index spec does not map any label".to_string(),
        ));
    }

    for label in settings.labels() {
        let specs: Vec<String> = settings
            .specs_for(label)
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(label = %label, specs = ?specs, "Mirroring label");
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_mirror_shared::{IndexSpec, LabelMapping};

    fn config(spec: Option<&str>) -> MirrorConfig {
        MirrorConfig {
            index_spec: spec.map(str::to_string),
            ..MirrorConfig::default()
        }
    }

    #[test]
    fn test_load_settings() {
        let settings = load_settings(&config(Some("people:Person(name,age)"))).unwrap();
        assert!(settings.is_indexed("Person"));
        assert!(settings.include_id_field());
        assert!(settings.include_labels_field());
    }

    #[test]
    fn test_load_settings_disabled() {
        assert!(matches!(
            load_settings(&config(None)),
            Err(MirrorError::Disabled(_))
        ));
        assert!(matches!(
            load_settings(&config(Some("Person(name)"))),
            Err(MirrorError::Disabled(_))
        ));
    }

    #[test]
    fn test_load_settings_duplicate_label() {
        assert!(matches!(
            load_settings(&config(Some("bad:Label(x,y),bad:Label(z)"))),
            Err(MirrorError::SpecError(_))
        ));
    }

    #[test]
    fn test_snapshot_is_unaffected_by_later_update() {
        let mut mapping = LabelMapping::new();
        mapping.insert("Person".to_string(), vec![IndexSpec::new("people", ["name"])]);
        let handle = SettingsHandle::new(IndexSettings::new(mapping, true, true));

        let before = handle.snapshot();
        handle.update(|s| s.clone().with_include_id_field(false));
        let after = handle.snapshot();

        assert!(before.include_id_field());
        assert!(!after.include_id_field());
        assert_eq!(before.mapping(), after.mapping());
    }

    #[test]
    fn test_replace() {
        let handle = SettingsHandle::default();
        assert!(handle.snapshot().is_empty());

        let mut mapping = LabelMapping::new();
        mapping.insert("Person".to_string(), vec![IndexSpec::new("people", ["name"])]);
        handle.replace(IndexSettings::new(mapping, false, false));
        assert!(handle.snapshot().is_indexed("Person"));
    }
}
