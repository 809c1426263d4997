//! HTTP request handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::adapters::{embed, rerank, translate};
use crate::api::models::{
    EmbedRequest, EmbedResponse, HealthResponse, LangIdQuery, RerankRequest, RerankResponse,
    TranslateRequest, TranslateResponse,
};
use crate::error::AppError;
use crate::langid::{self, Detection};
use crate::AppState;

/// Embed one text or a batch of texts
#[utoipa::path(
    post,
    path = "/embed/{model}",
    tag = "Embedding",
    params(("model" = String, Path, description = "Embedding model name")),
    request_body = EmbedRequest,
    responses(
        (status = 200, description = "Embedding vectors", body = EmbedResponse),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Backend failure"),
    )
)]
pub async fn embed_handler(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, AppError> {
    info!(
        model = %model,
        texts = request.text.len(),
        sparse = request.sparse,
        "Received embed request"
    );

    let inputs = embed::build_inputs(&request)?;
    let requested = embed::requested_outputs(request.sparse);

    let outputs = state.backend.infer(&model, inputs, &requested).await?;
    let response = embed::parse_outputs(&request, &outputs)?;

    Ok(Json(response))
}

/// Score one or many documents against a query
#[utoipa::path(
    post,
    path = "/rerank/{model}",
    tag = "Reranking",
    params(("model" = String, Path, description = "Reranking model name")),
    request_body = RerankRequest,
    responses(
        (status = 200, description = "Relevance scores", body = RerankResponse),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Backend failure"),
    )
)]
pub async fn rerank_handler(
    State(state): State<Arc<AppState>>,
    Path(model): Path<String>,
    Json(request): Json<RerankRequest>,
) -> Result<Json<RerankResponse>, AppError> {
    info!(
        model = %model,
        docs = request.doc.len(),
        "Received rerank request"
    );

    let inputs = rerank::build_inputs(&request)?;
    let outputs = state
        .backend
        .infer(&model, inputs, &rerank::REQUESTED_OUTPUTS)
        .await?;
    let response = rerank::parse_outputs(&request, &outputs)?;

    Ok(Json(response))
}

/// Translate text between two supported languages
#[utoipa::path(
    post,
    path = "/translate",
    tag = "Translation",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text", body = TranslateResponse),
        (status = 400, description = "Invalid request or unsupported language"),
        (status = 502, description = "Backend failure"),
    )
)]
pub async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, AppError> {
    // Language resolution happens before the backend is touched; an
    // unsupported code never becomes an inference call
    let languages = translate::resolve_languages(&request)?;

    info!(
        src = languages.src_tag,
        tgt = languages.tgt_tag,
        chars = request.text.len(),
        "Received translate request"
    );

    let inputs = translate::build_inputs(&request, languages);
    let model = state.settings.backend.translate_model.clone();

    let outputs = state
        .backend
        .infer(&model, inputs, &translate::REQUESTED_OUTPUTS)
        .await?;
    let response = translate::parse_outputs(&outputs)?;

    Ok(Json(response))
}

/// Identify the language of free text. Resolved locally, never forwarded
/// to the backend.
#[utoipa::path(
    get,
    path = "/langid",
    tag = "Language",
    params(LangIdQuery),
    responses(
        (status = 200, description = "Detected language and confidence", body = Detection),
        (status = 400, description = "Empty or unclassifiable text"),
    )
)]
pub async fn langid_handler(
    Query(query): Query<LangIdQuery>,
) -> Result<Json<Detection>, AppError> {
    if query.q.is_empty() {
        return Err(AppError::Validation("q must not be empty".to_string()));
    }

    let detection = langid::identify(&query.q).ok_or_else(|| {
        AppError::Validation("could not identify the language".to_string())
    })?;

    Ok(Json(detection))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Gateway health", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.readiness.is_ready() {
            "healthy"
        } else {
            "degraded"
        }
        .to_string(),
        backend: state.readiness.as_str().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
