//! Mutation translator.
//!
//! Turns the mutations of one transaction into a [`Batch`] holding at most one
//! action per (index, document id).
//!
//! Categories are processed in the fixed order of [`MutationCategory::ORDER`]
//! and a later category's action replaces an earlier one for the same key,
//! so the last category that touched a document decides what is sent:
//!
//! | Category          | Action per matching spec                               |
//! |-------------------|--------------------------------------------------------|
//! | created           | index, for every indexed label of the entity           |
//! | label attached    | index; delete when the entity is deleted in this tx    |
//! | label detached    | delete, for the detached label's specs only; and for   |
//! |                   | every indexed label of an entity deleted in the tx     |
//! | property attached | index (full re-projection), skipped for deleted ones   |
//! | property detached | update (partial), skipped for entities deleted in tx   |
//!
//! A create followed by a property removal in the same transaction therefore
//! nets an update for a document the cluster has not seen yet.

use std::collections::HashSet;
use std::fmt;

use graph_mirror_shared::{
    ActionKind, Batch, GraphEntity, IndexSettings, IndexSpec, PendingAction, TransactionDelta,
};
use tracing::{debug, instrument, trace};

use crate::projector::{project, project_partial};

/// Mutation categories, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MutationCategory {
    Created,
    LabelAttached,
    LabelDetached,
    PropertyAttached,
    PropertyDetached,
}

impl MutationCategory {
    /// Processing order. Later entries win over earlier ones.
    pub const ORDER: [MutationCategory; 5] = [
        Self::Created,
        Self::LabelAttached,
        Self::LabelDetached,
        Self::PropertyAttached,
        Self::PropertyDetached,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::LabelAttached => "label_attached",
            Self::LabelDetached => "label_detached",
            Self::PropertyAttached => "property_attached",
            Self::PropertyDetached => "property_detached",
        }
    }
}

impl fmt::Display for MutationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translator from transaction deltas to pending document actions.
///
/// Translation is synchronous, performs no I/O and cannot fail: unmatched
/// labels contribute nothing and missing properties are left out.
#[derive(Debug, Default)]
pub struct MutationTranslator {}

impl MutationTranslator {
    /// Create a new mutation translator.
    pub fn new() -> Self {
        Self {}
    }

    /// Translate one transaction against a settings snapshot.
    #[instrument(skip_all)]
    pub fn translate<D: TransactionDelta>(&self, delta: &D, settings: &IndexSettings) -> Batch {
        let mut emitter = Emitter::new(settings);
        if settings.is_empty() {
            return emitter.finish();
        }

        for category in MutationCategory::ORDER {
            emitter.category = category;
            match category {
                MutationCategory::Created => {
                    for entity in delta.created_entities() {
                        emitter.index_all_labels(entity);
                    }
                }
                MutationCategory::LabelAttached => {
                    for (entity, label) in delta.label_attach_events() {
                        if delta.is_marked_deleted(entity) {
                            emitter.delete_label(entity, label);
                        } else {
                            emitter.index_label(entity, label);
                        }
                    }
                }
                MutationCategory::LabelDetached => {
                    for (entity, label) in delta.label_detach_events() {
                        emitter.delete_label(entity, label);
                    }
                    for entity in delta.deleted_entities() {
                        emitter.delete_all_labels(entity);
                    }
                }
                MutationCategory::PropertyAttached => {
                    let mut seen = HashSet::new();
                    for (entity, _key) in delta.property_attach_events() {
                        if delta.is_marked_deleted(entity) || !seen.insert(entity.id()) {
                            continue;
                        }
                        emitter.index_all_labels(entity);
                    }
                }
                MutationCategory::PropertyDetached => {
                    let mut seen = HashSet::new();
                    for (entity, _key) in delta.property_detach_events() {
                        if delta.is_marked_deleted(entity) || !seen.insert(entity.id()) {
                            continue;
                        }
                        emitter.update_all_labels(entity);
                    }
                }
            }
        }

        emitter.finish()
    }
}

/// Emits actions into a batch, tracking overwrites for diagnostics.
struct Emitter<'s> {
    settings: &'s IndexSettings,
    batch: Batch,
    category: MutationCategory,
    emitted: usize,
    replaced: usize,
}

impl<'s> Emitter<'s> {
    fn new(settings: &'s IndexSettings) -> Self {
        Self {
            settings,
            batch: Batch::new(),
            category: MutationCategory::Created,
            emitted: 0,
            replaced: 0,
        }
    }

    fn index_all_labels<E: GraphEntity>(&mut self, entity: &E) {
        for label in entity.labels() {
            self.index_label(entity, &label);
        }
    }

    fn delete_all_labels<E: GraphEntity>(&mut self, entity: &E) {
        for label in entity.labels() {
            self.delete_label(entity, &label);
        }
    }

    fn update_all_labels<E: GraphEntity>(&mut self, entity: &E) {
        for label in entity.labels() {
            let id = entity.id();
            for spec in self.specs(&label) {
                self.emit(PendingAction::Update {
                    index: spec.index_name().to_string(),
                    type_name: label.clone(),
                    id: id.clone(),
                    document: project_partial(entity, spec, self.settings),
                });
            }
        }
    }

    fn index_label<E: GraphEntity>(&mut self, entity: &E, label: &str) {
        let id = entity.id();
        for spec in self.specs(label) {
            self.emit(PendingAction::Index {
                index: spec.index_name().to_string(),
                type_name: label.to_string(),
                id: id.clone(),
                document: project(entity, spec, self.settings),
            });
        }
    }

    fn delete_label<E: GraphEntity>(&mut self, entity: &E, label: &str) {
        let id = entity.id();
        for spec in self.specs(label) {
            self.emit(PendingAction::Delete {
                index: spec.index_name().to_string(),
                type_name: label.to_string(),
                id: id.clone(),
            });
        }
    }

    fn specs(&self, label: &str) -> &'s [IndexSpec] {
        self.settings.specs_for(label)
    }

    fn emit(&mut self, action: PendingAction) {
        let key = action.key();
        let kind = action.kind();
        self.emitted += 1;
        if let Some(previous) = self.batch.insert(action) {
            self.replaced += 1;
            trace!(
                key = %key,
                category = %self.category,
                replaced = %previous.kind(),
                with = %kind,
                "Later mutation category replaced pending action"
            );
        }
    }

    fn finish(self) -> Batch {
        if !self.batch.is_empty() {
            debug!(
                batch_id = %self.batch.id(),
                actions = self.batch.len(),
                index = self.batch.count(ActionKind::Index),
                update = self.batch.count(ActionKind::Update),
                delete = self.batch.count(ActionKind::Delete),
                emitted = self.emitted,
                replaced = self.replaced,
                "Translated transaction"
            );
        }
        self.batch
    }
}
