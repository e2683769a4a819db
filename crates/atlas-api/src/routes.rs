//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::handlers::{crew, guardrails, health, rag};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create the AI service routes, mounted under the API prefix
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/rag-query", post(rag::rag_query_handler))
        .route("/run-crew", post(crew::run_crew_handler))
        .route(
            "/generate-structured",
            post(guardrails::generate_structured_handler),
        )
}
