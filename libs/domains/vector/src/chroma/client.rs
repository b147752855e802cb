use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ChromaConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::index::VectorIndex;
use crate::models::{CollectionHandle, DocumentBatch, Metadata, QueryInput, QueryResult};

/// `VectorIndex` backed by a Chroma server (HTTP API v2).
///
/// Chroma does not embed server-side, so query texts and text-only records go
/// through the attached embedding function before the request is sent.
pub struct ChromaIndex {
    client: Client,
    config: ChromaConfig,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ChromaIndex {
    pub fn new(config: ChromaConfig, embedder: Arc<dyn EmbeddingProvider>) -> VectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorError::Config(format!("Failed to build Chroma client: {}", e)))?;

        Ok(Self {
            client,
            config,
            embedder,
        })
    }

    fn collection_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.config.collections_url(),
            urlencoding::encode(key)
        )
    }

    fn record_url(&self, collection: &CollectionHandle, action: &str) -> String {
        format!("{}/{}", self.collection_url(&collection.id), action)
    }
}

#[derive(Debug, Deserialize)]
struct ChromaCollection {
    id: String,
    name: String,
    #[serde(default)]
    metadata: Option<Metadata>,
}

impl From<ChromaCollection> for CollectionHandle {
    fn from(collection: ChromaCollection) -> Self {
        CollectionHandle {
            id: collection.id,
            name: collection.name,
            metadata: collection.metadata.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateCollectionBody<'a> {
    name: &'a str,
    metadata: &'a Metadata,
    get_or_create: bool,
}

#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    ids: &'a [String],
    embeddings: &'a [Vec<f32>],
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<&'a [String]>,
    metadatas: &'a [Metadata],
}

#[derive(Debug, Serialize)]
struct DeleteBody {
    ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct QueryBody {
    query_embeddings: Vec<Vec<f32>>,
    n_results: usize,
    include: [&'static str; 3],
}

#[derive(Debug, Deserialize)]
struct ChromaQueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f32>>>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Metadata>>>>,
}

impl ChromaQueryResponse {
    /// Align optional columns with `ids`; missing cells become `None`
    fn into_result(self) -> VectorResult<QueryResult> {
        let distances = self
            .distances
            .ok_or_else(|| VectorError::Backend("Chroma query returned no distances".to_string()))?;

        let shape: Vec<usize> = self.ids.iter().map(Vec::len).collect();
        let distances = distances
            .into_iter()
            .map(|row| row.into_iter().map(|d| d.unwrap_or(f32::INFINITY)).collect())
            .collect();

        Ok(QueryResult {
            ids: self.ids,
            distances,
            documents: self
                .documents
                .unwrap_or_else(|| shape.iter().map(|n| vec![None; *n]).collect()),
            metadatas: self
                .metadatas
                .unwrap_or_else(|| shape.iter().map(|n| vec![None; *n]).collect()),
        })
    }
}

/// Pass successful responses through; map failures to domain errors.
///
/// A 404 (or a "does not exist" message, which older servers send with other
/// codes) becomes `CollectionNotFound` when a collection name is in scope.
async fn ensure_success(response: Response, collection: Option<&str>) -> VectorResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    if let Some(name) = collection {
        if status == StatusCode::NOT_FOUND || body.contains("does not exist") {
            return Err(VectorError::CollectionNotFound(name.to_string()));
        }
    }

    Err(VectorError::Backend(format!(
        "Chroma returned {}: {}",
        status, body
    )))
}

#[async_trait]
impl VectorIndex for ChromaIndex {
    async fn heartbeat(&self) -> VectorResult<()> {
        let response = self.client.get(self.config.heartbeat_url()).send().await?;
        ensure_success(response, None).await?;
        Ok(())
    }

    async fn list_collections(&self) -> VectorResult<Vec<String>> {
        let response = self
            .client
            .get(self.config.collections_url())
            .send()
            .await?;
        let collections: Vec<ChromaCollection> =
            ensure_success(response, None).await?.json().await?;

        Ok(collections.into_iter().map(|c| c.name).collect())
    }

    async fn get_collection(&self, name: &str) -> VectorResult<CollectionHandle> {
        let response = self.client.get(self.collection_url(name)).send().await?;
        let collection: ChromaCollection =
            ensure_success(response, Some(name)).await?.json().await?;

        Ok(collection.into())
    }

    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Metadata,
    ) -> VectorResult<CollectionHandle> {
        let body = CreateCollectionBody {
            name,
            metadata: &metadata,
            get_or_create: true,
        };

        let response = self
            .client
            .post(self.config.collections_url())
            .json(&body)
            .send()
            .await?;
        let collection: ChromaCollection = ensure_success(response, None).await?.json().await?;

        debug!(collection = %name, id = %collection.id, "Resolved Chroma collection");
        Ok(collection.into())
    }

    async fn delete_collection(&self, name: &str) -> VectorResult<()> {
        let response = self.client.delete(self.collection_url(name)).send().await?;
        ensure_success(response, Some(name)).await?;
        Ok(())
    }

    async fn count(&self, collection: &CollectionHandle) -> VectorResult<usize> {
        let response = self
            .client
            .get(self.record_url(collection, "count"))
            .send()
            .await?;

        Ok(ensure_success(response, Some(collection.name.as_str()))
            .await?
            .json()
            .await?)
    }

    async fn upsert(
        &self,
        collection: &CollectionHandle,
        batch: DocumentBatch,
    ) -> VectorResult<usize> {
        let embeddings = match (batch.embeddings, &batch.documents) {
            (Some(embeddings), _) => embeddings,
            (None, Some(documents)) => self.embedder.embed_batch(documents).await?,
            (None, None) => {
                return Err(VectorError::Validation(
                    "either documents or embeddings must be supplied".to_string(),
                ));
            }
        };

        let body = UpsertBody {
            ids: &batch.ids,
            embeddings: &embeddings,
            documents: batch.documents.as_deref(),
            metadatas: &batch.metadatas,
        };

        let response = self
            .client
            .post(self.record_url(collection, "upsert"))
            .json(&body)
            .send()
            .await?;
        ensure_success(response, Some(collection.name.as_str())).await?;

        Ok(batch.ids.len())
    }

    async fn delete(&self, collection: &CollectionHandle, ids: Vec<String>) -> VectorResult<()> {
        let response = self
            .client
            .post(self.record_url(collection, "delete"))
            .json(&DeleteBody { ids })
            .send()
            .await?;
        ensure_success(response, Some(collection.name.as_str())).await?;
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionHandle,
        input: QueryInput,
        n_results: usize,
    ) -> VectorResult<QueryResult> {
        let query_embeddings = match input {
            QueryInput::Embeddings(vectors) => vectors,
            QueryInput::Texts(texts) => self.embedder.embed_batch(&texts).await?,
        };

        let body = QueryBody {
            query_embeddings,
            n_results,
            include: ["documents", "metadatas", "distances"],
        };

        let response = self
            .client
            .post(self.record_url(collection, "query"))
            .json(&body)
            .send()
            .await?;
        let parsed: ChromaQueryResponse = ensure_success(response, Some(collection.name.as_str()))
            .await?
            .json()
            .await?;

        parsed.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use serde_json::json;

    fn response(status: u16, body: &str) -> Response {
        axum::http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[test]
    fn test_record_urls_use_collection_id() {
        let index = ChromaIndex::new(
            ChromaConfig::new("http://chroma:8000".to_string()),
            Arc::new(HashEmbedder::new()),
        )
        .unwrap();
        let handle = CollectionHandle {
            id: "5f0c".to_string(),
            name: "docs".to_string(),
            metadata: Metadata::new(),
        };

        assert_eq!(
            index.record_url(&handle, "query"),
            "http://chroma:8000/api/v2/tenants/default_tenant/databases/default_database/collections/5f0c/query"
        );
        assert!(index.collection_url("my docs").ends_with("/collections/my%20docs"));
    }

    #[test]
    fn test_collection_without_metadata() {
        let parsed: ChromaCollection =
            serde_json::from_value(json!({ "id": "1", "name": "docs", "metadata": null })).unwrap();
        let handle: CollectionHandle = parsed.into();
        assert!(handle.metadata.is_empty());
    }

    #[test]
    fn test_query_response_fills_missing_columns() {
        let parsed: ChromaQueryResponse = serde_json::from_value(json!({
            "ids": [["a", "b"]],
            "distances": [[0.5, 1.5]],
            "documents": null,
            "metadatas": [[{ "id": "a" }, null]]
        }))
        .unwrap();

        let result = parsed.into_result().unwrap();
        assert_eq!(result.ids, vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(result.distances, vec![vec![0.5, 1.5]]);
        assert_eq!(result.documents, vec![vec![None, None]]);
        assert!(result.metadatas[0][1].is_none());
    }

    #[test]
    fn test_query_response_requires_distances() {
        let parsed: ChromaQueryResponse =
            serde_json::from_value(json!({ "ids": [["a"]] })).unwrap();
        assert!(matches!(parsed.into_result(), Err(VectorError::Backend(_))));
    }

    #[tokio::test]
    async fn test_ensure_success_maps_not_found() {
        let err = ensure_success(response(404, "{}"), Some("docs"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = ensure_success(
            response(500, "Collection docs does not exist."),
            Some("docs"),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_ensure_success_maps_other_failures_to_backend() {
        let err = ensure_success(response(500, "boom"), Some("docs"))
            .await
            .unwrap_err();
        assert!(matches!(err, VectorError::Backend(ref msg) if msg.contains("boom")));

        let err = ensure_success(response(404, "no route"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, VectorError::Backend(_)));
    }

    #[tokio::test]
    async fn test_ensure_success_passes_success_through() {
        assert!(ensure_success(response(200, "1"), None).await.is_ok());
    }
}
