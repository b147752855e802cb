//! Exact-search, process-local `VectorIndex`.
//!
//! Brute-force squared-L2 ranking over every record of a collection. Used as
//! the default backend for local runs and as the reference backend in tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::embedding::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::index::VectorIndex;
use crate::models::{CollectionHandle, DocumentBatch, Metadata, QueryInput, QueryResult};

#[derive(Debug)]
struct StoredRecord {
    id: String,
    document: Option<String>,
    metadata: Metadata,
    embedding: Vec<f32>,
}

#[derive(Debug)]
struct StoredCollection {
    handle: CollectionHandle,
    /// Fixed by the first record written
    dimension: Option<usize>,
    records: Vec<StoredRecord>,
    /// id -> index into `records`
    positions: HashMap<String, usize>,
}

impl StoredCollection {
    fn new(handle: CollectionHandle) -> Self {
        Self {
            handle,
            dimension: None,
            records: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Overwrite in place when the id exists, append otherwise
    fn put(&mut self, record: StoredRecord) {
        match self.positions.get(&record.id) {
            Some(&pos) => self.records[pos] = record,
            None => {
                self.positions.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    fn remove(&mut self, doomed: &HashSet<String>) {
        self.records.retain(|r| !doomed.contains(&r.id));
        self.positions = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id.clone(), pos))
            .collect();
    }

    fn check_dimension(&self, vector: &[f32]) -> VectorResult<()> {
        match self.dimension {
            Some(dimension) if dimension != vector.len() => Err(VectorError::Validation(format!(
                "embedding dimension {} does not match collection dimension {}",
                vector.len(),
                dimension
            ))),
            _ => Ok(()),
        }
    }

    fn nearest(&self, query: &[f32], n_results: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, record)| (pos, squared_l2(query, &record.embedding)))
            .collect();

        // Stable: equal distances keep insertion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(n_results);
        scored
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// In-memory index with an attached embedding function
pub struct InMemoryIndex {
    embedder: Arc<dyn EmbeddingProvider>,
    collections: RwLock<Vec<StoredCollection>>,
}

impl InMemoryIndex {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            collections: RwLock::new(Vec::new()),
        }
    }

    async fn vectors_for(&self, batch: &DocumentBatch) -> VectorResult<Vec<Vec<f32>>> {
        match (&batch.embeddings, &batch.documents) {
            (Some(embeddings), _) => Ok(embeddings.clone()),
            (None, Some(documents)) => self.embedder.embed_batch(documents).await,
            (None, None) => Err(VectorError::Validation(
                "either documents or embeddings must be supplied".to_string(),
            )),
        }
    }

    async fn query_vectors(&self, input: QueryInput) -> VectorResult<Vec<Vec<f32>>> {
        match input {
            QueryInput::Embeddings(vectors) => Ok(vectors),
            QueryInput::Texts(texts) => self.embedder.embed_batch(&texts).await,
        }
    }
}

fn position(collections: &[StoredCollection], name: &str) -> Option<usize> {
    collections.iter().position(|c| c.handle.name == name)
}

fn by_handle<'a>(
    collections: &'a [StoredCollection],
    handle: &CollectionHandle,
) -> VectorResult<&'a StoredCollection> {
    collections
        .iter()
        .find(|c| c.handle.id == handle.id)
        .ok_or_else(|| VectorError::CollectionNotFound(handle.name.clone()))
}

fn by_handle_mut<'a>(
    collections: &'a mut [StoredCollection],
    handle: &CollectionHandle,
) -> VectorResult<&'a mut StoredCollection> {
    collections
        .iter_mut()
        .find(|c| c.handle.id == handle.id)
        .ok_or_else(|| VectorError::CollectionNotFound(handle.name.clone()))
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn heartbeat(&self) -> VectorResult<()> {
        Ok(())
    }

    async fn list_collections(&self) -> VectorResult<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections.iter().map(|c| c.handle.name.clone()).collect())
    }

    async fn get_collection(&self, name: &str) -> VectorResult<CollectionHandle> {
        let collections = self.collections.read().await;
        position(&collections, name)
            .map(|pos| collections[pos].handle.clone())
            .ok_or_else(|| VectorError::CollectionNotFound(name.to_string()))
    }

    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Metadata,
    ) -> VectorResult<CollectionHandle> {
        if name.trim().is_empty() {
            return Err(VectorError::Validation(
                "collection name must not be empty".to_string(),
            ));
        }

        let mut collections = self.collections.write().await;
        if let Some(pos) = position(&collections, name) {
            return Ok(collections[pos].handle.clone());
        }

        let handle = CollectionHandle {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            metadata,
        };
        debug!(collection = %name, id = %handle.id, "Created in-memory collection");

        collections.push(StoredCollection::new(handle.clone()));
        Ok(handle)
    }

    async fn delete_collection(&self, name: &str) -> VectorResult<()> {
        let mut collections = self.collections.write().await;
        let pos = position(&collections, name)
            .ok_or_else(|| VectorError::CollectionNotFound(name.to_string()))?;
        collections.remove(pos);
        Ok(())
    }

    async fn count(&self, collection: &CollectionHandle) -> VectorResult<usize> {
        let collections = self.collections.read().await;
        Ok(by_handle(&collections, collection)?.records.len())
    }

    async fn upsert(
        &self,
        collection: &CollectionHandle,
        batch: DocumentBatch,
    ) -> VectorResult<usize> {
        // Embed before taking the write lock
        let vectors = self.vectors_for(&batch).await?;

        if vectors.len() != batch.len() || batch.metadatas.len() != batch.len() {
            return Err(VectorError::Validation(
                "ids, metadatas and embeddings must have the same length".to_string(),
            ));
        }
        if let Some(documents) = &batch.documents {
            if documents.len() != batch.len() {
                return Err(VectorError::Validation(
                    "ids and documents must have the same length".to_string(),
                ));
            }
        }

        let mut collections = self.collections.write().await;
        let stored = by_handle_mut(&mut collections, collection)?;

        let dimension = stored.dimension.or_else(|| vectors.first().map(Vec::len));
        if let Some(dimension) = dimension {
            if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
                return Err(VectorError::Validation(format!(
                    "embedding dimension {} does not match collection dimension {}",
                    bad.len(),
                    dimension
                )));
            }
        }
        stored.dimension = dimension;

        let DocumentBatch {
            ids,
            documents,
            metadatas,
            ..
        } = batch;
        let mut documents = documents.map(Vec::into_iter);
        let written = ids.len();

        for ((id, metadata), embedding) in ids.into_iter().zip(metadatas).zip(vectors) {
            stored.put(StoredRecord {
                document: documents.as_mut().and_then(Iterator::next),
                id,
                metadata,
                embedding,
            });
        }

        Ok(written)
    }

    async fn delete(&self, collection: &CollectionHandle, ids: Vec<String>) -> VectorResult<()> {
        let doomed: HashSet<String> = ids.into_iter().collect();
        let mut collections = self.collections.write().await;
        let stored = by_handle_mut(&mut collections, collection)?;
        stored.remove(&doomed);
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionHandle,
        input: QueryInput,
        n_results: usize,
    ) -> VectorResult<QueryResult> {
        let queries = self.query_vectors(input).await?;

        let collections = self.collections.read().await;
        let stored = by_handle(&collections, collection)?;

        let mut result = QueryResult::default();
        for query in &queries {
            stored.check_dimension(query)?;

            let ranked = stored.nearest(query, n_results);
            let records = ranked.iter().map(|(pos, _)| &stored.records[*pos]);

            result.ids.push(records.clone().map(|r| r.id.clone()).collect());
            result
                .distances
                .push(ranked.iter().map(|(_, distance)| *distance).collect());
            result
                .documents
                .push(records.clone().map(|r| r.document.clone()).collect());
            result
                .metadatas
                .push(records.map(|r| Some(r.metadata.clone())).collect());
        }

        Ok(result)
    }
}
