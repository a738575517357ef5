//! Bulk API request bodies and response parsing.
//!
//! A bulk body is newline-delimited JSON: one metadata line per action,
//! followed by a source line for `index` (the full document) and `update`
//! (`{"doc": ...}`). Deletes carry no source line.
//!
//! API reference: https://docs.opensearch.org/latest/api-reference/document-apis/bulk/

use graph_mirror_shared::{ActionKind, Batch, PendingAction};
use serde_json::{json, Map, Value};

use crate::errors::SearchIndexError;
use crate::types::{BatchOperationResult, BatchOperationSummary};

/// Build the bulk body lines for every action of the batch, in batch order.
///
/// The type name of an action is not sent: OpenSearch 2.x has no mapping types.
pub fn bulk_lines(batch: &Batch) -> Vec<Value> {
    let mut lines = Vec::with_capacity(batch.len() * 2);
    for action in batch.actions() {
        let mut meta = Map::new();
        meta.insert(
            action.kind().as_str().to_string(),
            json!({ "_index": action.index_name(), "_id": action.id() }),
        );
        lines.push(Value::Object(meta));

        match action {
            PendingAction::Index { document, .. } => lines.push(Value::Object(document.clone())),
            PendingAction::Update { document, .. } => lines.push(json!({ "doc": document })),
            PendingAction::Delete { .. } => {}
        }
    }
    lines
}

/// Parse a bulk response body into a per-item summary.
///
/// An item fails when it carries an `error` object or a non-2xx status. A
/// delete answered with 404 counts as success: the document is already gone.
pub fn parse_bulk_response(body: &Value) -> Result<BatchOperationSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("bulk response has no `items` array"))?;
    let took_ms = body.get("took").and_then(Value::as_u64).unwrap_or(0);

    let results = items
        .iter()
        .map(parse_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BatchOperationSummary::from_results(results, took_ms))
}

fn parse_item(item: &Value) -> Result<BatchOperationResult, SearchIndexError> {
    let (op, detail) = item
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| SearchIndexError::parse(format!("malformed bulk item: {}", item)))?;
    let action = ActionKind::from_bulk_op(op)
        .ok_or_else(|| SearchIndexError::parse(format!("unknown bulk operation `{}`", op)))?;

    let status = detail
        .get("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .unwrap_or(0);
    let error = detail.get("error").map(describe_error);
    let missing_on_delete = action == ActionKind::Delete && status == 404;
    let success = missing_on_delete || (error.is_none() && (200..300).contains(&status));

    Ok(BatchOperationResult {
        index: string_field(detail, "_index"),
        id: string_field(detail, "_id"),
        action,
        status,
        success,
        error: if success { None } else { error.or_else(|| Some(format!("status {}", status))) },
    })
}

fn describe_error(error: &Value) -> String {
    match (
        error.get("type").and_then(Value::as_str),
        error.get("reason").and_then(Value::as_str),
    ) {
        (Some(kind), Some(reason)) => format!("{}: {}", kind, reason),
        (None, Some(reason)) => reason.to_string(),
        (Some(kind), None) => kind.to_string(),
        (None, None) => error.to_string(),
    }
}

fn string_field(detail: &Value, key: &str) -> String {
    detail
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
