//! Integration tests for the graph mirror.
//!
//! These tests drive the real parser, translator and dispatcher through the
//! public `SearchMirror` facade, with a mock `SearchIndexProvider` standing
//! in for the cluster.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use graph_mirror::dispatcher::{BatchReceipt, DispatchListener};
use graph_mirror::extension::load_settings;
use graph_mirror::{
    BatchDispatcher, DispatchError, DispatchMode, DispatchOutcome, MirrorConfig, MirrorError,
    SearchMirror,
};
use graph_mirror_repository::{
    BatchOperationResult, BatchOperationSummary, SearchIndexError, SearchIndexProvider,
};
use graph_mirror_shared::{ActionKind, Batch, DocumentKey, NodeRecord, TransactionRecord};
use serde_json::{json, Value};
use tokio::runtime::Handle;

// Mock Search Provider for testing
struct MockSearchProvider {
    batches: Mutex<Vec<Batch>>,
    fail_transport: bool,
}

impl MockSearchProvider {
    fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail_transport: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail_transport: true,
            ..Self::new()
        }
    }

    fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchIndexProvider for MockSearchProvider {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn bulk(&self, batch: &Batch) -> Result<BatchOperationSummary, SearchIndexError> {
        if self.fail_transport {
            return Err(SearchIndexError::bulk_request("connection reset"));
        }
        self.batches.lock().unwrap().push(batch.clone());
        let results = batch
            .actions()
            .map(|a| BatchOperationResult {
                index: a.index_name().to_string(),
                id: a.id().to_string(),
                action: a.kind(),
                status: 200,
                success: true,
                error: None,
            })
            .collect();
        Ok(BatchOperationSummary::from_results(results, 2))
    }
}

#[derive(Default)]
struct CollectingListener {
    completed: Mutex<Vec<BatchReceipt>>,
    failed: Mutex<Vec<BatchReceipt>>,
}

impl DispatchListener for CollectingListener {
    fn on_completed(&self, receipt: &BatchReceipt, _summary: &BatchOperationSummary) {
        self.completed.lock().unwrap().push(receipt.clone());
    }

    fn on_failed(&self, receipt: &BatchReceipt, _error: &DispatchError) {
        self.failed.lock().unwrap().push(receipt.clone());
    }
}

fn config(spec: &str) -> MirrorConfig {
    MirrorConfig::from_lookup(|key| match key {
        "MIRROR_INDEX_SPEC" => Some(spec.to_string()),
        _ => None,
    })
    .unwrap()
}

fn mirror_with(
    spec: &str,
    provider: Arc<MockSearchProvider>,
    listener: Arc<CollectingListener>,
) -> SearchMirror {
    let settings = load_settings(&config(spec)).unwrap();
    let dispatcher = BatchDispatcher::new(provider, Handle::current())
        .with_listener(listener)
        .with_timeout(Duration::from_secs(1));
    SearchMirror::new(settings, dispatcher)
}

fn document(batch: &Batch, index: &str, id: &str) -> Value {
    let action = batch.get(&DocumentKey::new(index, id)).unwrap();
    Value::Object(action.document().unwrap().clone())
}

#[tokio::test]
async fn test_create_is_mirrored_after_commit() {
    let provider = Arc::new(MockSearchProvider::new());
    let listener = Arc::new(CollectingListener::default());
    let mirror = mirror_with("my_index:Person(name,age)", provider.clone(), listener.clone());

    let mut tx = TransactionRecord::new();
    tx.create(NodeRecord::new(10).with_label("Person").with_property("name", "Ann"));

    let batch = mirror.before_commit(&tx);
    let batch_id = batch.id();
    assert_eq!(
        document(&batch, "my_index", "10"),
        json!({"id": "10", "labels": ["Person"], "name": "Ann"})
    );

    mirror.after_commit(&tx, batch).unwrap().await.unwrap();

    assert_eq!(provider.batch_count(), 1);
    let completed = listener.completed.lock().unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].batch_id, batch_id);
}

#[tokio::test]
async fn test_compound_transaction_last_category_wins() {
    let provider = Arc::new(MockSearchProvider::new());
    let listener = Arc::new(CollectingListener::default());
    let mirror = mirror_with(
        "people:Person(name,age),staff:Employee(name)",
        provider.clone(),
        listener,
    );

    let mut tx = TransactionRecord::new();
    // Node 1: created, then loses a property -> update.
    tx.create(
        NodeRecord::new(1)
            .with_label("Person")
            .with_property("name", "Ann"),
    )
    .remove_property(1, "age");
    // Node 2: Employee label removed, Person kept and a property changed.
    tx.upsert_node(
        NodeRecord::new(2)
            .with_label("Person")
            .with_property("name", "Bob")
            .with_property("age", 30),
    )
    .detach_label(2, "Employee")
    .set_property(2, "age");
    // Node 3: deleted along with its labels.
    tx.delete(NodeRecord::new(3).with_label("Employee"));

    let batch = mirror.before_commit(&tx);

    assert_eq!(batch.len(), 4);
    assert_eq!(
        batch.get(&DocumentKey::new("people", "1")).unwrap().kind(),
        ActionKind::Update
    );
    assert_eq!(
        batch.get(&DocumentKey::new("staff", "2")).unwrap().kind(),
        ActionKind::Delete
    );
    assert_eq!(
        document(&batch, "people", "2"),
        json!({"id": "2", "labels": ["Person"], "name": "Bob", "age": 30})
    );
    assert_eq!(
        batch.get(&DocumentKey::new("staff", "3")).unwrap().kind(),
        ActionKind::Delete
    );

    match mirror.dispatch(batch, DispatchMode::Synchronous).await {
        Ok(DispatchOutcome::Completed(summary)) => assert_eq!(summary.succeeded, 4),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(provider.batch_count(), 1);
}

#[tokio::test]
async fn test_transport_failure_does_not_reach_host() {
    let provider = Arc::new(MockSearchProvider::failing());
    let listener = Arc::new(CollectingListener::default());
    let mirror = mirror_with("people:Person(name)", provider.clone(), listener.clone());

    let mut tx = TransactionRecord::new();
    tx.create(NodeRecord::new(1).with_label("Person").with_property("name", "Ann"));

    let batch = mirror.before_commit(&tx);
    mirror.after_commit(&tx, batch).unwrap().await.unwrap();

    assert_eq!(listener.failed.lock().unwrap().len(), 1);
    assert!(listener.completed.lock().unwrap().is_empty());

    let batch = mirror.before_commit(&tx);
    let result = mirror.dispatch(batch, DispatchMode::Synchronous).await;
    assert!(matches!(result, Err(DispatchError::Transport(_))));
}

#[tokio::test]
async fn test_unindexed_transaction_sends_nothing() {
    let provider = Arc::new(MockSearchProvider::new());
    let listener = Arc::new(CollectingListener::default());
    let mirror = mirror_with("people:Person(name)", provider.clone(), listener);

    let mut tx = TransactionRecord::new();
    tx.create(NodeRecord::new(1).with_label("Robot").with_property("name", "R2"));

    let batch = mirror.before_commit(&tx);
    assert!(batch.is_empty());
    assert!(mirror.after_commit(&tx, batch).is_none());
    assert_eq!(provider.batch_count(), 0);
}

#[test]
fn test_spec_errors_disable_the_mirror() {
    assert!(matches!(
        load_settings(&config("bad:Label(x,y),bad:Label(z)")),
        Err(MirrorError::SpecError(_))
    ));
    assert!(matches!(
        load_settings(&config("nothing valid here")),
        Err(MirrorError::Disabled(_))
    ));
}
