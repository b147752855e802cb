use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

/// Chroma server connection configuration
#[derive(Debug, Clone)]
pub struct ChromaConfig {
    pub url: String,
    pub tenant: String,
    pub database: String,
    pub timeout_secs: u64,
}

impl ChromaConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            ..Self::default()
        }
    }

    pub fn with_database(mut self, tenant: String, database: String) -> Self {
        self.tenant = tenant;
        self.database = database;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// `{url}/api/v2/tenants/{tenant}/databases/{database}/collections`
    pub fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.url.trim_end_matches('/'),
            urlencoding::encode(&self.tenant),
            urlencoding::encode(&self.database)
        )
    }

    pub fn heartbeat_url(&self) -> String {
        format!("{}/api/v2/heartbeat", self.url.trim_end_matches('/'))
    }
}

impl FromEnv for ChromaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("CHROMA_URL", "http://localhost:8000"),
            tenant: env_or_default("CHROMA_TENANT", "default_tenant"),
            database: env_or_default("CHROMA_DATABASE", "default_database"),
            timeout_secs: env_parse("CHROMA_TIMEOUT_SECS", 30)?,
        })
    }
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            tenant: "default_tenant".to_string(),
            database: "default_database".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_url() {
        let config = ChromaConfig::new("http://chromadb:8000/".to_string());
        assert_eq!(
            config.collections_url(),
            "http://chromadb:8000/api/v2/tenants/default_tenant/databases/default_database/collections"
        );
        assert_eq!(config.heartbeat_url(), "http://chromadb:8000/api/v2/heartbeat");
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("CHROMA_URL", Some("http://chroma.internal:9000")),
                ("CHROMA_TENANT", Some("acme")),
                ("CHROMA_DATABASE", None),
                ("CHROMA_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = ChromaConfig::from_env().unwrap();
                assert_eq!(config.url, "http://chroma.internal:9000");
                assert_eq!(config.tenant, "acme");
                assert_eq!(config.database, "default_database");
                assert_eq!(config.timeout_secs, 5);
            },
        );
    }

    #[test]
    fn test_from_env_bad_timeout() {
        temp_env::with_var("CHROMA_TIMEOUT_SECS", Some("soon"), || {
            assert!(ChromaConfig::from_env().is_err());
        });
    }
}
