use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, VectorResult};
use crate::models::{
    AddDocuments, AddOutcome, CollectionList, CreateOutcome, DeleteOutcome, ExistsOutcome,
    QueryDocuments, QueryOutcome,
};
use crate::service::CollectionGateway;

// ===== Request/Response DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: bool,
}

/// Ids of documents to delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteDocumentsRequest {
    pub ids: Vec<String>,
}

// ===== Collection Management =====

/// List collection names
#[utoipa::path(
    get,
    path = "/chroma/collections",
    tag = "collections",
    responses(
        (status = 200, description = "Collection names, or an error diagnostic", body = CollectionList)
    )
)]
pub async fn list_collections(State(gateway): State<Arc<CollectionGateway>>) -> Json<CollectionList> {
    Json(gateway.list_collections().await)
}

#[utoipa::path(
    get,
    path = "/chroma/collections/{name}/exists",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Existence check", body = ExistsOutcome)
    )
)]
pub async fn collection_exists(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
) -> Json<ExistsOutcome> {
    Json(gateway.collection_exists(&name).await)
}

/// Document count of an existing collection
#[utoipa::path(
    get,
    path = "/chroma/collections/{name}/count",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Document count", body = CountResponse),
        (status = 404, description = "Collection not found", body = ErrorResponse),
        (status = 503, description = "Index unavailable", body = ErrorResponse)
    )
)]
pub async fn collection_count(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
) -> VectorResult<Json<CountResponse>> {
    let count = gateway.collection_count(&name).await?;
    Ok(Json(CountResponse { count }))
}

/// Create a collection if it does not exist yet
#[utoipa::path(
    post,
    path = "/chroma/collections/{name}/create",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Collection ready, or an error diagnostic", body = CreateOutcome)
    )
)]
pub async fn create_collection(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
) -> Json<CreateOutcome> {
    Json(gateway.create_collection(&name).await)
}

/// Delete a collection and all its documents
#[utoipa::path(
    delete,
    path = "/chroma/collections/{name}",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    responses(
        (status = 200, description = "Collection deleted", body = DeletedResponse),
        (status = 404, description = "Collection not found", body = ErrorResponse),
        (status = 503, description = "Index unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_collection(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
) -> VectorResult<Json<DeletedResponse>> {
    gateway.delete_collection(&name).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

// ===== Document Operations =====

/// Upsert documents, creating the collection on first use
#[utoipa::path(
    post,
    path = "/chroma/collections/{name}/add",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    request_body = AddDocuments,
    responses(
        (status = 200, description = "Write status", body = AddOutcome)
    )
)]
pub async fn add_documents(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
    Json(request): Json<AddDocuments>,
) -> Json<AddOutcome> {
    Json(gateway.add_documents(&name, request).await)
}

#[utoipa::path(
    delete,
    path = "/chroma/collections/{name}/delete",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    request_body = DeleteDocumentsRequest,
    responses(
        (status = 200, description = "Number of ids requested", body = DeleteOutcome)
    )
)]
pub async fn delete_documents(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
    Json(request): Json<DeleteDocumentsRequest>,
) -> Json<DeleteOutcome> {
    Json(gateway.delete_documents(&name, request.ids).await)
}

/// Nearest-neighbor search by text or embedding
#[utoipa::path(
    post,
    path = "/chroma/collections/{name}/query",
    tag = "collections",
    params(("name" = String, Path, description = "Collection name")),
    request_body = QueryDocuments,
    responses(
        (status = 200, description = "Ranked results, or an error diagnostic", body = QueryOutcome)
    )
)]
pub async fn query(
    State(gateway): State<Arc<CollectionGateway>>,
    Path(name): Path<String>,
    Json(request): Json<QueryDocuments>,
) -> Json<QueryOutcome> {
    Json(gateway.query(&name, request).await)
}
