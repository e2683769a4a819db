//! Atlas Guardrails - schema-validated structured generation
//!
//! A specification (a `.rail` file or a named schema) describes the output
//! a prompt must produce. The generator asks the model, validates the answer
//! against the specification and re-asks on failure.
//!
//! No model is called yet. The placeholder generator picks its answer from
//! the specification name alone:
//! - `UserProfileSpec` yields a fixed user profile record
//! - `InvalidSpecExample` always fails validation
//! - `*.rail` and any other name yield a templated string
//!
//! Author: hephaex@gmail.com

use atlas_core::{AtlasError, Result, ServicesConfig, StructuredGenerator, StructuredOutput};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Delay of a simulated generate-and-validate round trip
pub const DEFAULT_GENERATION_LATENCY: Duration = Duration::from_millis(200);

pub const USER_PROFILE_SPEC: &str = "UserProfileSpec";
pub const INVALID_SPEC_EXAMPLE: &str = "InvalidSpecExample";
pub const RAIL_SUFFIX: &str = ".rail";

/// Kind of specification a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    UserProfile,
    InvalidExample,
    Rail,
    Schema,
}

impl SpecKind {
    pub fn classify(spec_name: &str) -> Self {
        match spec_name {
            USER_PROFILE_SPEC => Self::UserProfile,
            INVALID_SPEC_EXAMPLE => Self::InvalidExample,
            name if name.ends_with(RAIL_SUFFIX) => Self::Rail,
            _ => Self::Schema,
        }
    }
}

/// Stand-in for a Guardrails-backed generator
#[derive(Debug, Clone)]
pub struct PlaceholderGuard {
    latency: Duration,
}

impl Default for PlaceholderGuard {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_LATENCY)
    }
}

impl PlaceholderGuard {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn from_config(services: &ServicesConfig) -> Self {
        if services.simulate_latency {
            Self::default()
        } else {
            Self::new(Duration::ZERO)
        }
    }

    /// Error reported when no specification is registered under `spec_name`
    pub fn spec_not_found(spec_name: &str) -> AtlasError {
        AtlasError::SpecNotFound(format!("Especificação '{spec_name}' não encontrada."))
    }

    fn validate(spec_name: &str) -> Result<StructuredOutput> {
        match SpecKind::classify(spec_name) {
            SpecKind::UserProfile => {
                tracing::debug!("Returning placeholder user profile");
                Ok(StructuredOutput::Object(user_profile()))
            }
            SpecKind::InvalidExample => {
                tracing::warn!(spec_name, "Simulating validation failure");
                Err(AtlasError::GuardrailsValidation(format!(
                    "Falha na validação (placeholder) para a spec '{spec_name}'. Campo 'X' está faltando."
                )))
            }
            SpecKind::Rail => {
                tracing::debug!(spec_name, "Returning placeholder for RAIL spec");
                Ok(format!("Resultado placeholder validado para spec RAIL '{spec_name}'.").into())
            }
            SpecKind::Schema => {
                tracing::debug!(spec_name, "Returning generic placeholder");
                Ok(format!("Resultado placeholder validado para spec '{spec_name}'.").into())
            }
        }
    }
}

fn user_profile() -> Map<String, Value> {
    let mut profile = Map::new();
    profile.insert("name".to_string(), json!("Placeholder User"));
    profile.insert("age".to_string(), json!(30));
    profile.insert("interests".to_string(), json!(["AI", "Cloud"]));
    profile
}

#[async_trait::async_trait]
impl StructuredGenerator for PlaceholderGuard {
    async fn generate(
        &self,
        prompt: &str,
        spec_name: &str,
        num_reasks: u32,
    ) -> Result<StructuredOutput> {
        tracing::info!(
            spec_name,
            num_reasks,
            prompt_len = prompt.len(),
            "Generating and validating (placeholder)"
        );
        tokio::time::sleep(self.latency).await;
        Self::validate(spec_name)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}
