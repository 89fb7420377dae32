//! # API REST
//!
//! HTTP surface of the symptom checker.
//!
//! ## Purpose
//! Routes JSON requests from the web frontend and the legacy conversational platform to the
//! core services, and serves the OpenAPI document with Swagger UI.
//!
//! ## Intended use
//! The workspace's `symptom-run` binary reads configuration, builds an [`AppState`] and serves
//! [`app`]. Tests drive the router in-process.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::RestConfig;
pub use state::AppState;

use handlers::*;

#[derive(OpenApi)]
#[openapi(
    paths(health, analyze, list_conditions, stats, chat, test_provider, webhook),
    components(schemas(
        api_shared::HealthRes,
        api_shared::AnalyzeReq,
        api_shared::AnalyzeRes,
        api_shared::MatchDto,
        api_shared::ConditionDto,
        api_shared::AiStatus,
        api_shared::StatsRes,
        api_shared::ChatReq,
        api_shared::ChatRes,
        api_shared::ChatSourceDto,
        api_shared::ProviderTestRes,
        api_shared::WebhookReq,
        api_shared::QueryResult,
        api_shared::WebhookParameters,
        api_shared::WebhookRes,
        api_shared::OutputContext,
        api_shared::ContextParameters,
    ))
)]
pub struct ApiDoc;

/// Builds the router with every route, Swagger UI and the given CORS policy.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/api/conditions", get(list_conditions))
        .route("/api/stats", get(stats))
        .route("/api/gemini-chat", post(chat))
        .route("/api/test-gemini", get(test_provider))
        .route("/webhook", post(webhook))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state)
}
