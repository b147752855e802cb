use async_trait::async_trait;

use crate::error::VectorResult;
use crate::models::EmbeddingProviderType;

/// Trait for embedding generation providers
///
/// Every vector a provider returns has exactly `dimension()` components.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> EmbeddingProviderType;

    /// Length of every vector this provider produces
    fn dimension(&self) -> usize;

    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving input order.
    ///
    /// An empty input returns an empty output without doing any work.
    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>>;
}
