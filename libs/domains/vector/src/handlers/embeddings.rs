use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::VectorResult;
use crate::models::HealthReport;
use crate::service::CollectionGateway;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbedRequest {
    pub texts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmbedResponse {
    /// One vector per input text, same order
    pub embeddings: Vec<Vec<f32>>,
}

/// Embed a batch of texts
#[utoipa::path(
    post,
    path = "/v1/embeddings",
    tag = "embeddings",
    request_body = EmbedRequest,
    responses(
        (status = 200, description = "Embeddings in input order", body = EmbedResponse),
        (status = 500, description = "Embedding failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn embed(
    State(gateway): State<Arc<CollectionGateway>>,
    Json(request): Json<EmbedRequest>,
) -> VectorResult<Json<EmbedResponse>> {
    let embeddings = gateway.embed(&request.texts).await?;
    Ok(Json(EmbedResponse { embeddings }))
}

/// Embedder and index readiness
#[utoipa::path(
    get,
    path = "/health",
    tag = "embeddings",
    responses(
        (status = 200, description = "Ready", body = HealthReport),
        (status = 503, description = "Degraded", body = HealthReport)
    )
)]
pub async fn health(State(gateway): State<Arc<CollectionGateway>>) -> impl IntoResponse {
    let report = gateway.health().await;
    let status = if report.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
