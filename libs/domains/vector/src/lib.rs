//! Vector Domain Library
//!
//! A thin gateway over a named-collection vector index, with a deterministic
//! hash embedder so that the whole pipeline runs without a model download.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐
//! │ CollectionGateway │  ← validation, metadata defaults, error reporting
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐     ┌───────────────────┐
//! │    VectorIndex    │     │ EmbeddingProvider │
//! │      (trait)      │     │      (trait)      │
//! └─────────┬─────────┘     └─────────┬─────────┘
//!           │                         │
//! ┌─────────▼─────────┐     ┌─────────▼─────────┐
//! │   InMemoryIndex   │     │   HashEmbedder    │
//! │   ChromaIndex     │     │   OpenAIProvider  │
//! └───────────────────┘     └───────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_vector::{
//!     AddDocuments, CollectionGateway, GatewayConfig, HashEmbedder, InMemoryIndex,
//!     QueryDocuments,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let embedder = Arc::new(HashEmbedder::new());
//! let index = Arc::new(InMemoryIndex::new(embedder.clone()));
//! let gateway = CollectionGateway::new(index, embedder, GatewayConfig::default());
//!
//! gateway
//!     .add_documents(
//!         "docs",
//!         AddDocuments::new(vec!["a".into(), "b".into()])
//!             .with_documents(vec!["cat".into(), "dog".into()]),
//!     )
//!     .await;
//!
//! let outcome = gateway
//!     .query("docs", QueryDocuments::texts(vec!["cat".into()]).with_n_results(1))
//!     .await;
//! assert!(outcome.error.is_none());
//! # }
//! ```

pub mod chroma;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod loader;
pub mod memory;
pub mod models;
pub mod policy;
pub mod service;

// Re-export commonly used types
pub use chroma::{ChromaConfig, ChromaIndex};
pub use embedding::{EMBED_DIM, EmbeddingProvider, HashEmbedder, OpenAIConfig, OpenAIProvider};
pub use error::{ErrorResponse, VectorError, VectorResult};
pub use handlers::{VectorApiDoc, router};
pub use index::VectorIndex;
pub use loader::{LoadedDocument, extract_documents};
pub use memory::InMemoryIndex;
pub use models::{
    AddDocuments, AddOutcome, CollectionHandle, CollectionList, CreateOutcome, DeleteOutcome,
    DocumentBatch, EmbeddingProviderType, ExistsOutcome, HealthReport, HealthStatus, Metadata,
    OperationStatus, QueryDocuments, QueryInput, QueryOutcome, QueryResult,
};
pub use policy::CollectionMetadataPolicy;
pub use service::{CollectionGateway, DEFAULT_N_RESULTS, GatewayConfig};
