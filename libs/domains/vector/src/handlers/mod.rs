//! HTTP surface over [`CollectionGateway`]

mod collections;
mod embeddings;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::models::{
    AddDocuments, AddOutcome, CollectionList, CreateOutcome, DeleteOutcome, ExistsOutcome,
    HealthReport, HealthStatus, OperationStatus, QueryDocuments, QueryOutcome, QueryResult,
};
use crate::service::CollectionGateway;

pub use collections::{CountResponse, DeleteDocumentsRequest, DeletedResponse};
pub use embeddings::{EmbedRequest, EmbedResponse};

/// OpenAPI documentation for the vector gateway
#[derive(OpenApi)]
#[openapi(
    paths(
        embeddings::embed,
        embeddings::health,
        collections::list_collections,
        collections::collection_exists,
        collections::collection_count,
        collections::create_collection,
        collections::delete_collection,
        collections::add_documents,
        collections::delete_documents,
        collections::query,
    ),
    components(
        schemas(
            EmbedRequest, EmbedResponse,
            HealthReport, HealthStatus,
            CollectionList, ExistsOutcome, CountResponse, CreateOutcome, DeletedResponse,
            AddDocuments, AddOutcome, OperationStatus,
            DeleteDocumentsRequest, DeleteOutcome,
            QueryDocuments, QueryOutcome, QueryResult,
            ErrorResponse
        )
    ),
    tags(
        (name = "embeddings", description = "Text embedding and readiness"),
        (name = "collections", description = "Collection and document operations")
    )
)]
pub struct VectorApiDoc;

/// Build the gateway router
pub fn router(gateway: CollectionGateway) -> Router {
    let shared = Arc::new(gateway);

    Router::new()
        .route("/v1/embeddings", post(embeddings::embed))
        .route("/health", get(embeddings::health))
        .route("/chroma/collections", get(collections::list_collections))
        .route(
            "/chroma/collections/{name}",
            delete(collections::delete_collection),
        )
        .route(
            "/chroma/collections/{name}/exists",
            get(collections::collection_exists),
        )
        .route(
            "/chroma/collections/{name}/count",
            get(collections::collection_count),
        )
        .route(
            "/chroma/collections/{name}/create",
            post(collections::create_collection),
        )
        .route(
            "/chroma/collections/{name}/add",
            post(collections::add_documents),
        )
        .route(
            "/chroma/collections/{name}/delete",
            delete(collections::delete_documents),
        )
        .route(
            "/chroma/collections/{name}/query",
            post(collections::query),
        )
        .with_state(shared)
}
