//! Deterministic hash-projection embedder.
//!
//! Each whitespace-separated token is hashed with SHA-256; the 32-byte digest is
//! repeated cyclically across the output dimension and summed over all tokens
//! (bytes scaled by 1/255). The sum is L2-normalized unless it is all zeros.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::EmbeddingProvider;
use crate::error::VectorResult;
use crate::models::EmbeddingProviderType;

/// Output dimension of the default embedder
pub const EMBED_DIM: usize = 128;

const DIGEST_LEN: usize = 32;

/// Stateless text embedder with no model dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dimension: EMBED_DIM,
        }
    }

    /// Embedder with a non-default output length. A zero dimension is bumped to 1.
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed one text. Pure and deterministic.
    ///
    /// Byte contributions are summed as integers and scaled once, so the result
    /// is bit-identical for any permutation of the same tokens.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut sums = vec![0u64; self.dimension];

        for token in text.split_whitespace() {
            let digest = Sha256::digest(token.as_bytes());
            for (i, slot) in sums.iter_mut().enumerate() {
                *slot += u64::from(digest[i % DIGEST_LEN]);
            }
        }

        let scaled: Vec<f64> = sums.iter().map(|&sum| sum as f64 / 255.0).collect();
        let norm = scaled.iter().map(|v| v * v).sum::<f64>().sqrt();

        if norm > 0.0 {
            scaled.iter().map(|v| (v / norm) as f32).collect()
        } else {
            vec![0.0; self.dimension]
        }
    }

    pub fn embed_texts(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed_text(text)).collect()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::Hash
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        Ok(self.embed_texts(texts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l2_norm(v: &[f32]) -> f64 {
        v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt()
    }

    #[test]
    fn test_output_length_is_fixed() {
        let embedder = HashEmbedder::new();
        for text in ["", "a", "x y z", "  padded\ttext\n"] {
            assert_eq!(embedder.embed_text(text).len(), EMBED_DIM, "input {:?}", text);
        }
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new();
        let first = embedder.embed_text("hello world");
        let second = embedder.embed_text("hello world");
        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_unit_norm_for_non_empty_text() {
        let embedder = HashEmbedder::new();
        for text in ["hello", "hello world", "the quick brown fox", "a a a a"] {
            let norm = l2_norm(&embedder.embed_text(text));
            assert!((norm - 1.0).abs() < 1e-5, "norm {} for {:?}", norm, text);
        }
    }

    #[test]
    fn test_empty_and_whitespace_only_text_is_zero_vector() {
        let embedder = HashEmbedder::new();
        assert!(embedder.embed_text("").iter().all(|v| *v == 0.0));
        assert!(embedder.embed_text(" \t\n ").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_token_order_does_not_matter() {
        let embedder = HashEmbedder::new();
        assert_eq!(embedder.embed_text("a b"), embedder.embed_text("b a"));
        assert_eq!(
            embedder.embed_text("one two three four"),
            embedder.embed_text("four three one two")
        );
    }

    #[test]
    fn test_whitespace_runs_are_a_single_separator() {
        let embedder = HashEmbedder::new();
        assert_eq!(embedder.embed_text("a b"), embedder.embed_text("  a \t\n b "));
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        let embedder = HashEmbedder::new();
        assert_ne!(embedder.embed_text("Hello"), embedder.embed_text("hello"));
    }

    #[test]
    fn test_repeated_tokens_are_not_deduplicated() {
        let embedder = HashEmbedder::new();
        // A single repeated token normalizes to the same direction...
        assert_eq!(embedder.embed_text("cat"), embedder.embed_text("cat cat"));
        // ...but repetition shifts the mix when other tokens are present.
        assert_ne!(
            embedder.embed_text("cat dog"),
            embedder.embed_text("cat cat dog")
        );
    }

    #[test]
    fn test_digest_repeats_across_dimension() {
        let v = HashEmbedder::new().embed_text("token");
        for i in 0..DIGEST_LEN {
            assert_eq!(v[i], v[i + DIGEST_LEN]);
            assert_eq!(v[i], v[i + 3 * DIGEST_LEN]);
        }
    }

    #[test]
    fn test_single_token_matches_digest_bytes() {
        let digest = Sha256::digest("hello".as_bytes());
        let raw: Vec<f64> = (0..EMBED_DIM)
            .map(|i| f64::from(digest[i % DIGEST_LEN]) / 255.0)
            .collect();
        let norm = raw.iter().map(|v| v * v).sum::<f64>().sqrt();

        let v = HashEmbedder::new().embed_text("hello");
        for (got, want) in v.iter().zip(raw.iter()) {
            assert!((f64::from(*got) - want / norm).abs() < 1e-6);
        }
    }

    #[test]
    fn test_custom_dimension() {
        let embedder = HashEmbedder::with_dimension(16);
        assert_eq!(embedder.embed_text("abc").len(), 16);
        assert_eq!(HashEmbedder::with_dimension(0).dimension(), 1);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let embedder = HashEmbedder::new();
        let texts = vec!["cat".to_string(), "dog".to_string(), "".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch[0], embedder.embed_text("cat"));
        assert_eq!(batch[1], embedder.embed_text("dog"));
        assert!(batch[2].iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let batch = HashEmbedder::new().embed_batch(&[]).await.unwrap();
        assert!(batch.is_empty());
    }
}
