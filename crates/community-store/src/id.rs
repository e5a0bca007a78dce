//! Store-side document ID generation.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;

use community_core::{fields, DocumentId};

use crate::error::{Result, StoreError};
use crate::traits::Document;

/// Length of generated identifiers.
pub const GENERATED_ID_LEN: usize = 20;

/// Generate a random 20-character alphanumeric document ID.
pub fn generate_id() -> Result<DocumentId> {
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(char::from)
        .collect();
    Ok(DocumentId::new(id)?)
}

/// The ID carried in a document's `id` field.
pub fn embedded_id(document: &Document) -> Result<DocumentId> {
    match document.get(fields::ID) {
        Some(Value::String(id)) => Ok(DocumentId::new(id.clone())?),
        _ => Err(StoreError::InvalidDocument(
            "document has no string id field".into(),
        )),
    }
}

/// Write `id` into the document's `id` field.
pub fn stamp_id(document: &mut Document, id: &DocumentId) {
    document.insert(fields::ID.to_owned(), Value::String(id.as_str().to_owned()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_are_distinct_and_alphanumeric() {
        let a = generate_id().unwrap();
        let b = generate_id().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), GENERATED_ID_LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_embedded_id() {
        let doc = json!({ "id": "p1" }).as_object().unwrap().clone();
        assert_eq!(embedded_id(&doc).unwrap().as_str(), "p1");

        let empty = json!({ "id": "" }).as_object().unwrap().clone();
        assert!(matches!(embedded_id(&empty), Err(StoreError::InvalidId(_))));

        let missing = json!({ "title": "x" }).as_object().unwrap().clone();
        assert!(matches!(
            embedded_id(&missing),
            Err(StoreError::InvalidDocument(_))
        ));
    }
}
