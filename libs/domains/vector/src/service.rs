use std::collections::HashSet;
use std::sync::Arc;

use core_config::{ConfigError, FromEnv, env_flag, env_parse};
use tracing::{debug, info, instrument, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::index::VectorIndex;
use crate::models::{
    AddDocuments, AddOutcome, CollectionList, CreateOutcome, DeleteOutcome, DocumentBatch,
    ExistsOutcome, HealthReport, HealthStatus, QueryDocuments, QueryInput, QueryOutcome,
};
use crate::policy::CollectionMetadataPolicy;

pub const DEFAULT_N_RESULTS: usize = 5;

const HEALTH_PROBE_TEXT: &str = "health check";

/// Gateway behaviour switches
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Embed text-only adds with the gateway's embedder instead of leaving it
    /// to the index's embedding function
    pub embed_on_add: bool,
    /// `n_results` used when a query omits it
    pub default_n_results: usize,
}

impl GatewayConfig {
    pub fn with_embed_on_add(mut self, embed_on_add: bool) -> Self {
        self.embed_on_add = embed_on_add;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            embed_on_add: true,
            default_n_results: DEFAULT_N_RESULTS,
        }
    }
}

impl FromEnv for GatewayConfig {
    /// EMBED_ON_ADD (default true), DEFAULT_N_RESULTS (default 5)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            embed_on_add: env_flag("EMBED_ON_ADD", true)?,
            default_n_results: env_parse("DEFAULT_N_RESULTS", DEFAULT_N_RESULTS)?,
        })
    }
}

/// Collection gateway over a vector index and an embedder.
///
/// Holds no collection state of its own. Operations with a neutral result
/// (list, exists, create, add, delete documents, query) never fail: backend
/// errors come back as a diagnostic next to the neutral value. `collection_count`
/// and `delete_collection` return hard errors so callers can tell a missing
/// collection apart from "nothing happened".
#[derive(Clone)]
pub struct CollectionGateway {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: GatewayConfig,
}

impl CollectionGateway {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            index,
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    // ===== Embedding Operations =====

    /// Batch embedding in input order
    pub async fn embed(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.embedder.embed_batch(texts).await
    }

    /// Embedder and index readiness, checked concurrently
    pub async fn health(&self) -> HealthReport {
        let model_check = async {
            let vector = self.embedder.embed(HEALTH_PROBE_TEXT).await?;
            if vector.len() != self.embedder.dimension() {
                return Err(VectorError::Embedding(format!(
                    "embedder returned {} components, expected {}",
                    vector.len(),
                    self.embedder.dimension()
                )));
            }
            Ok(())
        };

        let (model, index) = tokio::join!(model_check, self.index.heartbeat());

        let model_error = model.err().map(|e| e.to_string());
        let index_error = index.err().map(|e| e.to_string());
        let status = if model_error.is_none() && index_error.is_none() {
            HealthStatus::Ok
        } else {
            warn!(?model_error, ?index_error, "Health check degraded");
            HealthStatus::Degraded
        };

        HealthReport {
            status,
            model_ready: model_error.is_none(),
            index_ready: index_error.is_none(),
            model_error,
            index_error,
        }
    }

    // ===== Collection Management =====

    pub async fn list_collections(&self) -> CollectionList {
        match self.index.list_collections().await {
            Ok(collections) => CollectionList {
                collections,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Listing collections failed");
                CollectionList {
                    collections: vec![],
                    error: Some(e.to_string()),
                }
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn collection_exists(&self, name: &str) -> ExistsOutcome {
        let lookup = match validate_name(name) {
            Ok(()) => self.index.get_collection(name).await,
            Err(e) => Err(e),
        };

        match lookup {
            Ok(_) => ExistsOutcome {
                exists: true,
                error: None,
            },
            Err(e) => {
                if e.is_not_found() {
                    debug!("Collection does not exist");
                } else {
                    warn!(error = %e, "Collection lookup failed");
                }
                ExistsOutcome {
                    exists: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Document count of an existing collection. Never creates it.
    #[instrument(skip(self))]
    pub async fn collection_count(&self, name: &str) -> VectorResult<usize> {
        validate_name(name)?;
        let handle = self.index.get_collection(name).await?;
        self.index.count(&handle).await
    }

    /// Get-or-create with the default collection metadata. Idempotent.
    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str) -> CreateOutcome {
        let result = match validate_name(name) {
            Ok(()) => {
                self.index
                    .get_or_create_collection(
                        name,
                        CollectionMetadataPolicy::default_collection_metadata(),
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                info!("Collection ready");
                CreateOutcome {
                    created: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Creating collection failed");
                CreateOutcome {
                    created: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Remove a collection and all its documents; `CollectionNotFound` when absent
    #[instrument(skip(self))]
    pub async fn delete_collection(&self, name: &str) -> VectorResult<()> {
        validate_name(name)?;
        self.index.delete_collection(name).await?;
        info!("Collection deleted");
        Ok(())
    }

    // ===== Document Operations =====

    /// Upsert documents, creating the collection on first use
    #[instrument(skip(self, request), fields(documents = request.ids.len()))]
    pub async fn add_documents(&self, name: &str, request: AddDocuments) -> AddOutcome {
        match self.try_add_documents(name, request).await {
            Ok(count) => AddOutcome::written(count),
            Err(e) => {
                warn!(error = %e, "Adding documents failed");
                AddOutcome::failed(e.to_string())
            }
        }
    }

    async fn try_add_documents(&self, name: &str, request: AddDocuments) -> VectorResult<usize> {
        validate_name(name)?;
        validate_add(&request)?;

        let AddDocuments {
            ids,
            documents,
            metadatas,
            embeddings,
        } = request;

        let metadatas = CollectionMetadataPolicy::document_metadatas(&ids, metadatas)?;

        let embeddings = match (embeddings, &documents) {
            (None, Some(documents)) if self.config.embed_on_add => {
                Some(self.embedder.embed_batch(documents).await?)
            }
            (embeddings, _) => embeddings,
        };

        let handle = self
            .index
            .get_or_create_collection(name, CollectionMetadataPolicy::default_collection_metadata())
            .await?;

        let batch = DocumentBatch {
            ids,
            documents,
            metadatas,
            embeddings,
        };
        let written = self.index.upsert(&handle, batch).await?;

        debug!(written, "Documents upserted");
        Ok(written)
    }

    /// Delete documents by id; reports the number of ids requested
    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn delete_documents(&self, name: &str, ids: Vec<String>) -> DeleteOutcome {
        let requested = ids.len();

        let result = async {
            validate_name(name)?;
            let handle = self
                .index
                .get_or_create_collection(
                    name,
                    CollectionMetadataPolicy::default_collection_metadata(),
                )
                .await?;
            self.index.delete(&handle, ids).await
        }
        .await;

        match result {
            Ok(()) => DeleteOutcome {
                deleted: requested,
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Deleting documents failed");
                DeleteOutcome {
                    deleted: 0,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Nearest-neighbor search, creating the collection on first use.
    ///
    /// Exactly one of `query_texts` / `query_embeddings` must be supplied;
    /// anything else is rejected before the index is called.
    #[instrument(skip(self, request))]
    pub async fn query(&self, name: &str, request: QueryDocuments) -> QueryOutcome {
        match self.try_query(name, request).await {
            Ok(results) => QueryOutcome {
                results: Some(results),
                error: None,
            },
            Err(e) => {
                warn!(error = %e, "Query failed");
                QueryOutcome {
                    results: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_query(
        &self,
        name: &str,
        request: QueryDocuments,
    ) -> VectorResult<crate::models::QueryResult> {
        validate_name(name)?;

        let input = match (request.query_texts, request.query_embeddings) {
            (Some(texts), None) => QueryInput::Texts(texts),
            (None, Some(embeddings)) => QueryInput::Embeddings(embeddings),
            (None, None) => {
                return Err(VectorError::Validation(
                    "one of query_texts or query_embeddings is required".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(VectorError::Validation(
                    "query_texts and query_embeddings are mutually exclusive".to_string(),
                ));
            }
        };
        let n_results = request.n_results.unwrap_or(self.config.default_n_results);

        let handle = self
            .index
            .get_or_create_collection(name, CollectionMetadataPolicy::default_collection_metadata())
            .await?;

        self.index.query(&handle, input, n_results).await
    }
}

fn validate_name(name: &str) -> VectorResult<()> {
    if name.trim().is_empty() {
        return Err(VectorError::Validation(
            "collection name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_add(request: &AddDocuments) -> VectorResult<()> {
    let n = request.ids.len();

    if n == 0 {
        return Err(VectorError::Validation("ids must not be empty".to_string()));
    }

    let mut seen = HashSet::with_capacity(n);
    if let Some(duplicate) = request.ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(VectorError::Validation(format!(
            "duplicate id in request: {}",
            duplicate
        )));
    }

    if let Some(documents) = &request.documents {
        if documents.len() != n {
            return Err(VectorError::Validation(format!(
                "documents has {} entries but ids has {}",
                documents.len(),
                n
            )));
        }
    }

    if let Some(embeddings) = &request.embeddings {
        if embeddings.len() != n {
            return Err(VectorError::Validation(format!(
                "embeddings has {} entries but ids has {}",
                embeddings.len(),
                n
            )));
        }
    }

    if request.documents.is_none() && request.embeddings.is_none() {
        return Err(VectorError::Validation(
            "either documents or embeddings must be supplied".to_string(),
        ));
    }

    Ok(())
}
