use std::fmt;
use std::str::FromStr;

use core_config::{ConfigError, Environment, FromEnv, env_or_default, server::ServerConfig};
use domain_vector::{EmbeddingProviderType, GatewayConfig};

/// Where collections live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBackend {
    /// Process-local, lost on restart
    #[default]
    Memory,
    /// Remote Chroma server
    Chroma,
}

impl fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexBackend::Memory => f.write_str("memory"),
            IndexBackend::Chroma => f.write_str("chroma"),
        }
    }
}

impl FromStr for IndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(IndexBackend::Memory),
            "chroma" => Ok(IndexBackend::Chroma),
            other => Err(format!("unknown index backend '{}'", other)),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub index: IndexBackend,
    pub embedding: EmbeddingProviderType,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        let index = env_or_default("VECTOR_INDEX", "memory")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "VECTOR_INDEX".to_string(),
                details,
            })?;
        let embedding = env_or_default("EMBEDDING_PROVIDER", "hash")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "EMBEDDING_PROVIDER".to_string(),
                details,
            })?;

        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            gateway: GatewayConfig::from_env()?,
            index,
            embedding,
        })
    }
}
