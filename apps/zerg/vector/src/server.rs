//! HTTP server initialization and lifecycle management
//!
//! This module handles all server setup:
//! - Tracing initialization
//! - Embedding provider and index backend selection
//! - Router assembly (gateway routes, Swagger UI, tracing middleware)
//! - Graceful shutdown on SIGINT/SIGTERM

use std::sync::Arc;

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_vector::{
    ChromaConfig, ChromaIndex, CollectionGateway, EmbeddingProvider, EmbeddingProviderType,
    ErrorResponse, HashEmbedder, InMemoryIndex, OpenAIProvider, VectorApiDoc, VectorIndex,
};
use eyre::{Result, WrapErr};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, IndexBackend};

/// Run the HTTP server
///
/// 1. Sets up colored error reports and structured logging
/// 2. Builds the embedding provider and the index backend from configuration
/// 3. Serves the gateway router until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if configuration is invalid, a backend cannot be built,
/// or the listener fails to bind.
pub async fn run() -> Result<()> {
    install_color_eyre();

    let config = Config::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    let embedder = build_embedder(config.embedding)?;
    let index = build_index(config.index, embedder.clone())?;
    info!(
        index = %config.index,
        embedding = %config.embedding,
        dimension = embedder.dimension(),
        embed_on_add = config.gateway.embed_on_add,
        "Vector gateway configured"
    );

    let gateway = CollectionGateway::new(index, embedder, config.gateway.clone());
    let app = create_router(gateway);

    let listener = tokio::net::TcpListener::bind(config.server.address())
        .await
        .wrap_err_with(|| format!("Failed to bind {}", config.server.address()))?;
    info!("Server starting on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

fn build_embedder(provider: EmbeddingProviderType) -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(match provider {
        EmbeddingProviderType::Hash => Arc::new(HashEmbedder::new()),
        EmbeddingProviderType::OpenAI => Arc::new(
            OpenAIProvider::from_env().wrap_err("Failed to configure OpenAI embeddings")?,
        ),
    })
}

fn build_index(
    backend: IndexBackend,
    embedder: Arc<dyn EmbeddingProvider>,
) -> Result<Arc<dyn VectorIndex>> {
    Ok(match backend {
        IndexBackend::Memory => Arc::new(InMemoryIndex::new(embedder)),
        IndexBackend::Chroma => {
            let chroma = ChromaConfig::from_env().wrap_err("Failed to load Chroma configuration")?;
            info!("Using Chroma at {}", chroma.url);
            Arc::new(ChromaIndex::new(chroma, embedder)?)
        }
    })
}

/// Gateway routes plus API docs and HTTP tracing
pub fn create_router(gateway: CollectionGateway) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", VectorApiDoc::openapi()))
        .merge(domain_vector::router(gateway))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "NOT_FOUND".to_string(),
            message: "No route matches the request".to_string(),
        }),
    )
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
