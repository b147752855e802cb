use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::{CollectionHandle, DocumentBatch, Metadata, QueryInput, QueryResult};

/// Named-collection vector index the gateway delegates storage and search to.
///
/// Implementations must serialize writes to a collection so that concurrent
/// upserts never corrupt each other's documents. Query texts and text-only
/// records are embedded by the index's own embedding function.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Cheap reachability probe
    async fn heartbeat(&self) -> VectorResult<()>;

    // ===== Collection Management =====

    /// Collection names in creation order
    async fn list_collections(&self) -> VectorResult<Vec<String>>;

    /// Resolve an existing collection; `CollectionNotFound` when absent
    async fn get_collection(&self, name: &str) -> VectorResult<CollectionHandle>;

    /// Resolve a collection, creating it with `metadata` when absent.
    /// An existing collection keeps its metadata.
    async fn get_or_create_collection(
        &self,
        name: &str,
        metadata: Metadata,
    ) -> VectorResult<CollectionHandle>;

    /// Drop a collection and its documents; `CollectionNotFound` when absent
    async fn delete_collection(&self, name: &str) -> VectorResult<()>;

    // ===== Record Operations =====

    async fn count(&self, collection: &CollectionHandle) -> VectorResult<usize>;

    /// Insert or overwrite records by id; returns the number written
    async fn upsert(
        &self,
        collection: &CollectionHandle,
        batch: DocumentBatch,
    ) -> VectorResult<usize>;

    /// Delete records by id. Unknown ids are ignored.
    async fn delete(&self, collection: &CollectionHandle, ids: Vec<String>) -> VectorResult<()>;

    /// Nearest-neighbor search, at most `n_results` rows per query
    async fn query(
        &self,
        collection: &CollectionHandle,
        input: QueryInput,
        n_results: usize,
    ) -> VectorResult<QueryResult>;
}
