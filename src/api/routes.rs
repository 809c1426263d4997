//! HTTP route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::api::models::*;
use crate::langid::Detection;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ML Gateway API",
        version = "0.2.0",
        description = "Gateway translating embed/rerank/translate/langid requests into Triton v2 tensor inference calls.",
        license(name = "MIT"),
    ),
    paths(
        handlers::embed_handler,
        handlers::rerank_handler,
        handlers::translate_handler,
        handlers::langid_handler,
        handlers::health_handler,
    ),
    components(schemas(
        TextInput,
        FloatMatrix,
        IntMatrix,
        Scores,
        EmbedRequest,
        EmbedResponse,
        RerankRequest,
        RerankResponse,
        TranslateRequest,
        TranslateResponse,
        Detection,
        HealthResponse,
    )),
    tags(
        (name = "Embedding", description = "Dense and sparse text embeddings"),
        (name = "Reranking", description = "Query/document relevance scoring"),
        (name = "Translation", description = "Text translation"),
        (name = "Language", description = "Local language identification"),
        (name = "Health", description = "Health and monitoring endpoints"),
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    Router::new()
        .route("/embed/:model", post(handlers::embed_handler))
        .route("/rerank/:model", post(handlers::rerank_handler))
        .route("/translate", post(handlers::translate_handler))
        .route("/langid", get(handlers::langid_handler))
        .route("/health", get(handlers::health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
