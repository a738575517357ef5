//! Two-phase host interface.
//!
//! A host calls [`SearchMirror::before_commit`] while its transaction is still
//! open, then hands the batch to [`SearchMirror::after_commit`] once the
//! transaction is durable, or to [`SearchMirror::after_rollback`] otherwise.

mod settings;

pub use settings::{load_settings, SettingsHandle};

use std::sync::Arc;

use graph_mirror_shared::{Batch, IndexSettings, TransactionDelta};
use tokio::task::JoinHandle;
use tracing::trace;

use crate::dispatcher::{BatchDispatcher, DispatchMode, DispatchOutcome};
use crate::errors::DispatchError;
use crate::translator::MutationTranslator;

/// Mirrors committed graph mutations into search indices.
pub struct SearchMirror {
    translator: MutationTranslator,
    dispatcher: BatchDispatcher,
    settings: SettingsHandle,
}

impl SearchMirror {
    pub fn new(settings: IndexSettings, dispatcher: BatchDispatcher) -> Self {
        Self {
            translator: MutationTranslator::new(),
            dispatcher,
            settings: SettingsHandle::new(settings),
        }
    }

    /// Translate a transaction against the current settings snapshot.
    pub fn translate<D: TransactionDelta>(&self, delta: &D) -> Batch {
        let settings = self.settings.snapshot();
        self.translator.translate(delta, &settings)
    }

    /// Pre-commit phase. Never performs I/O.
    pub fn before_commit<D: TransactionDelta>(&self, delta: &D) -> Batch {
        self.translate(delta)
    }

    /// Post-commit phase: send the batch in the background.
    ///
    /// Failures are reported to the dispatcher's listener, never to the
    /// caller. Returns `None` when there is nothing to send.
    pub fn after_commit<D: TransactionDelta>(
        &self,
        _delta: &D,
        batch: Batch,
    ) -> Option<JoinHandle<()>> {
        self.dispatcher.spawn(batch)
    }

    /// The transaction rolled back; nothing was sent, so the batch is dropped.
    pub fn after_rollback<D: TransactionDelta>(&self, _delta: &D, batch: Batch) {
        trace!(
            batch_id = %batch.id(),
            actions = batch.len(),
            "Transaction rolled back, dropping batch"
        );
    }

    /// Submit a batch in an explicit mode.
    pub async fn dispatch(
        &self,
        batch: Batch,
        mode: DispatchMode,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.dispatcher.submit(batch, mode).await
    }

    pub fn settings(&self) -> Arc<IndexSettings> {
        self.settings.snapshot()
    }

    /// Takes effect for translations started after the call.
    pub fn set_include_id_field(&self, include: bool) {
        self.settings
            .update(|s| s.clone().with_include_id_field(include));
    }

    /// Takes effect for translations started after the call.
    pub fn set_include_labels_field(&self, include: bool) {
        self.settings
            .update(|s| s.clone().with_include_labels_field(include));
    }

    pub fn replace_settings(&self, settings: IndexSettings) {
        self.settings.replace(settings);
    }
}
