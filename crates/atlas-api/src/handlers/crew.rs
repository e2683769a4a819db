//! Crew execution handler
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use atlas_core::AtlasError;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

const CREW_FAILURE: &str = "Erro ao executar a Crew AI.";

/// Crew run request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CrewInput {
    /// Topic or goal for the crew
    #[schema(example = "Análise de mercado")]
    pub topic: String,

    /// Additional crew parameters; `null` is treated as empty
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub parameters: Option<Map<String, Value>>,
}

/// Crew run response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CrewResponse {
    /// Final result of the crew run
    #[schema(value_type = Object)]
    pub result: Value,

    /// Execution logs
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Run a crew of AI agents on a topic
#[utoipa::path(
    post,
    path = "/api/v1/run-crew",
    tag = "AI Services",
    request_body = CrewInput,
    responses(
        (status = 200, description = "Crew finished", body = CrewResponse),
        (status = 400, description = "Unsupported topic", body = crate::error::ApiError),
        (status = 422, description = "Invalid request body", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn run_crew_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<CrewInput>,
) -> Result<Json<CrewResponse>, AppError> {
    tracing::info!(topic = %input.topic, "Received crew run request");

    let parameters = input.parameters.unwrap_or_default();
    let outcome = state
        .crew
        .run(&input.topic, &parameters)
        .await
        .map_err(|e| match e {
            AtlasError::InvalidCrewInput(msg) => {
                tracing::warn!(topic = %input.topic, error = %msg, "Crew rejected input");
                AppError::BadRequest(msg)
            }
            other => AppError::from_service(other, CREW_FAILURE),
        })?;

    Ok(Json(CrewResponse {
        result: outcome.result,
        logs: outcome.logs,
    }))
}
