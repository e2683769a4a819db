//! Structured generation handler
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use atlas_core::{AtlasError, StructuredOutput};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

const GUARDRAILS_FAILURE: &str = "Erro na geração estruturada.";

/// Structured generation request body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GuardrailsInput {
    /// Prompt that produces the structured output
    #[schema(example = "Extraia dados do usuário")]
    pub prompt: String,

    /// Guardrails specification name (`.rail` file or schema name)
    #[schema(example = "UserProfileSpec")]
    pub spec_name: String,

    /// Number of correction attempts
    #[serde(default = "default_num_reasks")]
    #[validate(range(min = 0))]
    #[schema(default = 1)]
    pub num_reasks: i64,
}

fn default_num_reasks() -> i64 {
    1
}

/// Structured generation response body.
///
/// Validation failures are reported here with `validated_data = null`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GuardrailsResponse {
    /// Validated, structured data
    #[schema(value_type = Option<Object>)]
    pub validated_data: Option<StructuredOutput>,

    /// Error message if validation failed
    pub error: Option<String>,
}

/// Generate structured data validated against a specification
#[utoipa::path(
    post,
    path = "/api/v1/generate-structured",
    tag = "AI Services",
    request_body = GuardrailsInput,
    responses(
        (status = 200, description = "Generation finished; `error` is set when validation failed", body = GuardrailsResponse),
        (status = 404, description = "Specification not found", body = crate::error::ApiError),
        (status = 422, description = "Invalid request body", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn generate_structured_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<GuardrailsInput>,
) -> Result<Json<GuardrailsResponse>, AppError> {
    tracing::info!(spec_name = %input.spec_name, "Received structured generation request");

    let num_reasks = u32::try_from(input.num_reasks).unwrap_or(u32::MAX);
    let result = state
        .generator
        .generate(&input.prompt, &input.spec_name, num_reasks)
        .await;

    match result {
        Ok(data) => Ok(Json(GuardrailsResponse {
            validated_data: Some(data),
            error: None,
        })),
        Err(AtlasError::GuardrailsValidation(message)) => {
            tracing::warn!(
                spec_name = %input.spec_name,
                error = %message,
                "Guardrails validation failed"
            );
            Ok(Json(GuardrailsResponse {
                validated_data: None,
                error: Some(message),
            }))
        }
        Err(AtlasError::SpecNotFound(message)) => {
            tracing::warn!(
                spec_name = %input.spec_name,
                error = %message,
                "Specification not found"
            );
            Err(AppError::NotFound(message))
        }
        Err(e) => Err(AppError::from_service(e, GUARDRAILS_FAILURE)),
    }
}
