use std::time::Duration;

use domain_vector::{AddDocuments, AddOutcome, LoadedDocument, OperationStatus};
use eyre::{Result, WrapErr, bail};
use reqwest::Client;
use tracing::debug;

/// Minimal client for the gateway's add endpoint
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn add_url(&self, collection: &str) -> String {
        format!(
            "{}/chroma/collections/{}/add",
            self.base_url,
            urlencoding::encode(collection)
        )
    }

    /// Send every document in batches; returns the total written
    pub async fn load(
        &self,
        collection: &str,
        documents: &[LoadedDocument],
        batch_size: usize,
    ) -> Result<usize> {
        let mut written = 0;

        for (n, batch) in batches(documents, batch_size).enumerate() {
            let outcome: AddOutcome = self
                .client
                .post(self.add_url(collection))
                .json(&batch)
                .send()
                .await
                .wrap_err("Gateway request failed")?
                .error_for_status()
                .wrap_err("Gateway rejected the request")?
                .json()
                .await
                .wrap_err("Unexpected gateway response")?;

            if outcome.status == OperationStatus::Error {
                bail!(
                    "Batch {} was not written: {}",
                    n,
                    outcome.error.unwrap_or_default()
                );
            }

            debug!(batch = n, count = outcome.count, "Batch written");
            written += outcome.count;
        }

        Ok(written)
    }
}

/// Split documents into add requests of at most `size` entries
fn batches(documents: &[LoadedDocument], size: usize) -> impl Iterator<Item = AddDocuments> + '_ {
    documents.chunks(size.max(1)).map(|chunk| {
        let (ids, texts): (Vec<String>, Vec<String>) = chunk
            .iter()
            .map(|d| (d.id.clone(), d.text.clone()))
            .unzip();
        AddDocuments::new(ids).with_documents(texts)
    })
}
