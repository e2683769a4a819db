//! Atlas API - REST server
//!
//! Serves the RAG, Crew and Guardrails capabilities over HTTP.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use handlers::{crew, guardrails, health, rag};
use state::AppState;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atlas AI API",
        description = "RAG, CrewAI and Guardrails capabilities",
        version = "0.1.1"
    ),
    paths(
        health::root,
        health::ping,
        rag::rag_query_handler,
        crew::run_crew_handler,
        guardrails::generate_structured_handler,
    ),
    components(schemas(
        health::MessageResponse,
        rag::RagQueryInput,
        rag::RagResponse,
        crew::CrewInput,
        crew::CrewResponse,
        guardrails::GuardrailsInput,
        guardrails::GuardrailsResponse,
        error::ApiError,
    )),
    tags(
        (name = "health", description = "Liveness checks"),
        (name = "AI Services", description = "RAG, Crew and Guardrails endpoints")
    )
)]
pub struct ApiDoc;

/// Prefix the handler paths are documented under
const DOCUMENTED_PREFIX: &str = "/api/v1";

/// OpenAPI document with the AI routes moved under `prefix`
pub fn openapi_for_prefix(prefix: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if prefix == DOCUMENTED_PREFIX {
        return doc;
    }

    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DOCUMENTED_PREFIX) {
            Some(rest) => (format!("{prefix}{rest}"), item),
            None => (path, item),
        })
        .collect();
    doc
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let prefix = state.config.server.api_prefix.trim_end_matches('/').to_string();
    let cors = middleware::cors_layer(&state.config.server);

    let app = Router::new().route("/", get(health::root));
    let app = if prefix.is_empty() {
        app.merge(routes::api_routes())
    } else {
        app.nest(&prefix, routes::api_routes())
    };

    let doc = openapi_for_prefix(&prefix);
    app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router with instant placeholder services, for tests
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    let mut config = atlas_core::AppConfig::default();
    config.services.simulate_latency = false;
    create_router(Arc::new(AppState::new(config)))
}
