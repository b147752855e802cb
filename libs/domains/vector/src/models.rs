use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Free-form metadata attached to collections and documents
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A resolved collection in the underlying index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionHandle {
    /// Backend-assigned identifier (used for record operations)
    pub id: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub metadata: Metadata,
}

/// Records handed to the index for upsert.
///
/// `metadatas` is always resolved (one non-empty entry per id). When
/// `embeddings` is absent the index embeds `documents` with its own
/// embedding function.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBatch {
    pub ids: Vec<String>,
    pub documents: Option<Vec<String>>,
    pub metadatas: Vec<Metadata>,
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl DocumentBatch {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Query content for nearest-neighbor search
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    Texts(Vec<String>),
    Embeddings(Vec<Vec<f32>>),
}

impl QueryInput {
    /// Number of queries carried
    pub fn len(&self) -> usize {
        match self {
            QueryInput::Texts(texts) => texts.len(),
            QueryInput::Embeddings(vectors) => vectors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ranked results, one row per query, columns aligned by rank.
///
/// Distances are squared L2 by default: smaller means more similar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryResult {
    pub ids: Vec<Vec<String>>,
    pub distances: Vec<Vec<f32>>,
    pub documents: Vec<Vec<Option<String>>>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub metadatas: Vec<Vec<Option<Metadata>>>,
}

// ===== Gateway requests =====

/// Documents to add to a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddDocuments {
    pub ids: Vec<String>,
    #[serde(default)]
    pub documents: Option<Vec<String>>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub metadatas: Option<Vec<Metadata>>,
    #[serde(default)]
    pub embeddings: Option<Vec<Vec<f32>>>,
}

impl AddDocuments {
    pub fn new(ids: Vec<String>) -> Self {
        Self {
            ids,
            ..Self::default()
        }
    }

    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn with_metadatas(mut self, metadatas: Vec<Metadata>) -> Self {
        self.metadatas = Some(metadatas);
        self
    }

    pub fn with_embeddings(mut self, embeddings: Vec<Vec<f32>>) -> Self {
        self.embeddings = Some(embeddings);
        self
    }
}

/// Nearest-neighbor query against a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct QueryDocuments {
    #[serde(default)]
    pub query_texts: Option<Vec<String>>,
    #[serde(default)]
    pub query_embeddings: Option<Vec<Vec<f32>>>,
    /// Falls back to the gateway default (5) when omitted
    #[serde(default)]
    pub n_results: Option<usize>,
}

impl QueryDocuments {
    pub fn texts(texts: Vec<String>) -> Self {
        Self {
            query_texts: Some(texts),
            ..Self::default()
        }
    }

    pub fn embeddings(embeddings: Vec<Vec<f32>>) -> Self {
        Self {
            query_embeddings: Some(embeddings),
            ..Self::default()
        }
    }

    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = Some(n_results);
        self
    }
}

// ===== Gateway outcomes =====
//
// Operations with a neutral default never fail; they carry a diagnostic in
// `error` instead. An empty payload with `error: null` means "truly empty".

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CollectionList {
    pub collections: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExistsOutcome {
    pub exists: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateOutcome {
    pub created: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddOutcome {
    pub status: OperationStatus,
    pub count: usize,
    pub error: Option<String>,
}

impl AddOutcome {
    pub fn written(count: usize) -> Self {
        Self {
            status: OperationStatus::Ok,
            count,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: OperationStatus::Error,
            count: 0,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteOutcome {
    /// Number of ids requested for deletion
    pub deleted: usize,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QueryOutcome {
    pub results: Option<QueryResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Composite readiness of the embedder and the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub model_ready: bool,
    pub index_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_error: Option<String>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Embedding provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderType {
    /// Deterministic SHA-256 projection, no external service
    #[default]
    Hash,
    OpenAI,
}

impl fmt::Display for EmbeddingProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingProviderType::Hash => f.write_str("hash"),
            EmbeddingProviderType::OpenAI => f.write_str("openai"),
        }
    }
}

impl FromStr for EmbeddingProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(EmbeddingProviderType::Hash),
            "openai" => Ok(EmbeddingProviderType::OpenAI),
            other => Err(format!("unknown embedding provider '{}'", other)),
        }
    }
}
