//! Vector Loader
//!
//! Reads a JSON-LD site graph, extracts labelled nodes and adds them to a
//! collection of a running vector gateway.

use std::path::PathBuf;

use clap::Parser;
use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::{Result, WrapErr};
use tracing::info;

mod client;

use client::GatewayClient;

#[derive(Parser)]
#[command(name = "vector-loader")]
#[command(about = "Load JSON-LD documents into a vector gateway collection")]
struct Cli {
    /// JSON-LD file to read
    #[arg(short, long, default_value = "/tmp/site.jsonld")]
    file: PathBuf,

    /// Base URL of the vector gateway
    #[arg(short, long, default_value = "http://localhost:8081")]
    gateway: String,

    /// Target collection
    #[arg(short, long, default_value = "simplemodeling")]
    collection: String,

    /// Documents per add request
    #[arg(short, long, default_value_t = 64)]
    batch_size: usize,

    /// Extract and report without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();

    info!("Loading JSON-LD from {}", cli.file.display());
    let raw = tokio::fs::read_to_string(&cli.file)
        .await
        .wrap_err_with(|| format!("Failed to read {}", cli.file.display()))?;
    let graph: serde_json::Value =
        serde_json::from_str(&raw).wrap_err("File is not valid JSON")?;

    let documents = domain_vector::extract_documents(&graph);
    info!("Extracted {} documents", documents.len());

    if cli.dry_run || documents.is_empty() {
        return Ok(());
    }

    let client = GatewayClient::new(cli.gateway)?;
    let written = client
        .load(&cli.collection, &documents, cli.batch_size)
        .await?;

    info!(
        collection = %cli.collection,
        written,
        "Collection initialization complete"
    );
    Ok(())
}
