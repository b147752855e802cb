mod hash;
mod openai;
mod provider;

pub use hash::{EMBED_DIM, HashEmbedder};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::EmbeddingProvider;
#[cfg(test)]
pub use provider::MockEmbeddingProvider;
