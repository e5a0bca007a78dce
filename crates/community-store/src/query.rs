//! Evaluation of [`ListQuery`] over an in-process set of documents.
//!
//! Shared by the memory and SQLite backends so both order and paginate
//! identically.

use std::cmp::Ordering;

use serde_json::Value;

use community_core::DocumentId;

use crate::error::{Result, StoreError};
use crate::traits::{Document, ListQuery};

/// Sort `documents`, skip past the cursor and apply the limit.
pub fn apply(
    collection: &str,
    mut documents: Vec<(DocumentId, Document)>,
    query: &ListQuery,
) -> Result<Vec<Document>> {
    documents.sort_by(|(a_id, a), (b_id, b)| compare(query, a_id, a, b_id, b));

    let start = match &query.start_after {
        Some(cursor) => {
            let position = documents
                .iter()
                .position(|(id, _)| id == cursor)
                .ok_or_else(|| StoreError::not_found(collection, cursor))?;
            position + 1
        }
        None => 0,
    };

    Ok(documents
        .into_iter()
        .skip(start)
        .take(query.limit)
        .map(|(_, document)| document)
        .collect())
}

fn compare(
    query: &ListQuery,
    a_id: &DocumentId,
    a: &Document,
    b_id: &DocumentId,
    b: &Document,
) -> Ordering {
    for order in &query.order_by {
        let ordering = compare_values(
            a.get(&order.field).unwrap_or(&Value::Null),
            b.get(&order.field).unwrap_or(&Value::Null),
        );
        let ordering = if order.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a_id.cmp(b_id)
}

/// Total order over JSON values: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => {
                let x = x.as_f64().unwrap_or(f64::NAN);
                let y = y.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (x, y) in x.iter().zip(y) {
                let ordering = compare_values(x, y);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
