use std::time::Duration;

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse, env_required};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::error::{VectorError, VectorResult};
use crate::models::EmbeddingProviderType;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSION: usize = 1536;
const SHORTENABLE_PREFIX: &str = "text-embedding-3";

/// OpenAI embedding provider configuration
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Expected output length; also sent to the API for `text-embedding-3`
    /// models unless it is the default model's native size
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl OpenAIConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimension: DEFAULT_DIMENSION,
            timeout_secs: 30,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_model(mut self, model: String, dimension: usize) -> Self {
        self.model = model;
        self.dimension = dimension;
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }

    /// Older models such as `text-embedding-ada-002` reject `dimensions`
    fn requested_dimensions(&self) -> Option<usize> {
        let shortened = self.model != DEFAULT_MODEL || self.dimension != DEFAULT_DIMENSION;
        (shortened && self.model.starts_with(SHORTENABLE_PREFIX)).then_some(self.dimension)
    }
}

impl FromEnv for OpenAIConfig {
    /// OPENAI_API_KEY is required; OPENAI_BASE_URL, OPENAI_EMBEDDING_MODEL,
    /// OPENAI_EMBEDDING_DIMENSION and OPENAI_TIMEOUT_SECS are optional.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: env_required("OPENAI_API_KEY")?,
            base_url: env_or_default("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            model: env_or_default("OPENAI_EMBEDDING_MODEL", DEFAULT_MODEL),
            dimension: env_parse("OPENAI_EMBEDDING_DIMENSION", DEFAULT_DIMENSION)?,
            timeout_secs: env_parse("OPENAI_TIMEOUT_SECS", 30)?,
        })
    }
}

/// OpenAI embeddings provider
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn new(config: OpenAIConfig) -> VectorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VectorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> VectorResult<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

/// Restore request order and check every vector's length
fn order_embeddings(
    mut data: Vec<EmbeddingData>,
    expected: usize,
    dimension: usize,
) -> VectorResult<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(VectorError::Embedding(format!(
            "OpenAI returned {} embeddings for {} inputs",
            data.len(),
            expected
        )));
    }

    data.sort_by_key(|d| d.index);

    data.into_iter()
        .map(|d| {
            if d.embedding.len() == dimension {
                Ok(d.embedding)
            } else {
                Err(VectorError::Embedding(format!(
                    "OpenAI returned a {}-dimensional embedding, expected {}",
                    d.embedding.len(),
                    dimension
                )))
            }
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAI
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed(&self, text: &str) -> VectorResult<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| VectorError::Embedding("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> VectorResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
            dimensions: self.config.requested_dimensions(),
        };

        let response = self
            .client
            .post(self.config.embeddings_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VectorError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| VectorError::Embedding(e.to_string()))?;

        order_embeddings(body.data, texts.len(), self.config.dimension)
    }
}
