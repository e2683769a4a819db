//! RAG query handler
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use atlas_core::{AtlasError, RagAnswer, SourceRecord};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

/// Client-facing message for unexpected failures
const RAG_FAILURE: &str = "Erro ao processar consulta RAG.";

/// RAG query request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RagQueryInput {
    /// Question for the knowledge base
    #[schema(example = "Qual o status do projeto X?")]
    pub question: String,

    /// Optional session ID for conversation history
    pub session_id: Option<String>,
}

/// RAG query response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RagResponse {
    /// Generated answer
    #[schema(example = "Supabase é um Backend como Serviço (BaaS) incrível!")]
    pub answer: String,

    /// Sources used for the answer
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub sources: Vec<SourceRecord>,
}

impl From<RagAnswer> for RagResponse {
    fn from(answer: RagAnswer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources,
        }
    }
}

/// Answer a question from the knowledge base
#[utoipa::path(
    post,
    path = "/api/v1/rag-query",
    tag = "AI Services",
    request_body = RagQueryInput,
    responses(
        (status = 200, description = "Query answered", body = RagResponse),
        (status = 422, description = "Invalid request body", body = crate::error::ApiError),
        (status = 503, description = "Vector store not ready", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn rag_query_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(query): ValidatedJson<RagQueryInput>,
) -> Result<Json<RagResponse>, AppError> {
    tracing::info!(
        question = %query.question,
        session_id = ?query.session_id,
        "Received RAG query"
    );

    let answer = state
        .knowledge_base
        .query(&query.question)
        .await
        .map_err(|e| match e {
            AtlasError::VectorStoreNotReady(msg) => {
                tracing::warn!(error = %msg, "Vector store not ready");
                AppError::ServiceUnavailable(msg)
            }
            other => AppError::from_service(other, RAG_FAILURE),
        })?;

    Ok(Json(answer.into()))
}
