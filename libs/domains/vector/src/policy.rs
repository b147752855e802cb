//! Default metadata rules.
//!
//! The index rejects empty metadata maps, so collections and documents always
//! carry at least one key.

use serde_json::Value;

use crate::error::{VectorError, VectorResult};
use crate::models::Metadata;

/// Key of the sentinel entry given to collections created without metadata
pub const COLLECTION_SENTINEL_KEY: &str = "initialized";

/// Key of the synthesized per-document entry
pub const DOCUMENT_ID_KEY: &str = "id";

pub struct CollectionMetadataPolicy;

impl CollectionMetadataPolicy {
    /// `{"initialized": true}`
    pub fn default_collection_metadata() -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(COLLECTION_SENTINEL_KEY.to_string(), Value::Bool(true));
        metadata
    }

    /// Caller metadata when non-empty, otherwise the sentinel
    pub fn collection_metadata(supplied: Option<Metadata>) -> Metadata {
        match supplied {
            Some(metadata) if !metadata.is_empty() => metadata,
            _ => Self::default_collection_metadata(),
        }
    }

    /// `{"id": <id>}`
    pub fn document_metadata(id: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(DOCUMENT_ID_KEY.to_string(), Value::String(id.to_string()));
        metadata
    }

    /// One non-empty metadata entry per id.
    ///
    /// Omitted metadata is synthesized for every document; an empty entry inside
    /// supplied metadata is replaced the same way.
    pub fn document_metadatas(
        ids: &[String],
        supplied: Option<Vec<Metadata>>,
    ) -> VectorResult<Vec<Metadata>> {
        let Some(metadatas) = supplied else {
            return Ok(ids.iter().map(|id| Self::document_metadata(id)).collect());
        };

        if metadatas.len() != ids.len() {
            return Err(VectorError::Validation(format!(
                "metadatas has {} entries but ids has {}",
                metadatas.len(),
                ids.len()
            )));
        }

        Ok(ids
            .iter()
            .zip(metadatas)
            .map(|(id, metadata)| {
                if metadata.is_empty() {
                    Self::document_metadata(id)
                } else {
                    metadata
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn meta(value: Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_default_collection_metadata_is_sentinel() {
        let metadata = CollectionMetadataPolicy::default_collection_metadata();
        assert_eq!(Value::Object(metadata), json!({ "initialized": true }));
    }

    #[test]
    fn test_collection_metadata_keeps_non_empty_input() {
        let supplied = meta(json!({ "owner": "search" }));
        let resolved = CollectionMetadataPolicy::collection_metadata(Some(supplied.clone()));
        assert_eq!(resolved, supplied);

        let resolved = CollectionMetadataPolicy::collection_metadata(Some(Metadata::new()));
        assert_eq!(resolved, CollectionMetadataPolicy::default_collection_metadata());
    }

    #[test]
    fn test_omitted_document_metadata_is_keyed_by_id() {
        let resolved = CollectionMetadataPolicy::document_metadatas(&ids(&["a", "b"]), None).unwrap();
        assert_eq!(
            resolved,
            vec![meta(json!({ "id": "a" })), meta(json!({ "id": "b" }))]
        );
    }

    #[test]
    fn test_empty_entries_are_filled() {
        let supplied = vec![meta(json!({ "lang": "en" })), Metadata::new()];
        let resolved =
            CollectionMetadataPolicy::document_metadatas(&ids(&["a", "b"]), Some(supplied)).unwrap();
        assert_eq!(resolved[0], meta(json!({ "lang": "en" })));
        assert_eq!(resolved[1], meta(json!({ "id": "b" })));
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        let result = CollectionMetadataPolicy::document_metadatas(
            &ids(&["a", "b"]),
            Some(vec![meta(json!({ "k": 1 }))]),
        );
        assert!(matches!(result, Err(VectorError::Validation(_))));
    }
}
