//! Atlas Crew - multi-agent task runner
//!
//! A crew is a team of agents (researcher, writer, ...) working on a topic.
//! Agents, tasks and the LLM behind them are not wired in yet; the
//! placeholder runner returns a canned report for any topic.
//!
//! Author: hephaex@gmail.com

use atlas_core::{AtlasError, CrewOutcome, CrewRunner, Result, ServicesConfig};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Delay of a simulated crew run
pub const DEFAULT_RUN_LATENCY: Duration = Duration::from_millis(300);

/// Confidence reported by the placeholder crew
const PLACEHOLDER_CONFIDENCE: f64 = 0.5;

/// Stand-in for a real crew: same report shape, canned content
#[derive(Debug, Clone)]
pub struct PlaceholderCrew {
    latency: Duration,
}

impl Default for PlaceholderCrew {
    fn default() -> Self {
        Self::new(DEFAULT_RUN_LATENCY)
    }
}

impl PlaceholderCrew {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Crew whose latency follows `simulate_latency`
    pub fn from_config(services: &ServicesConfig) -> Self {
        if services.simulate_latency {
            Self::default()
        } else {
            Self::new(Duration::ZERO)
        }
    }

    /// Error reported when no crew handles the requested topic
    pub fn unsupported_topic(topic: &str) -> AtlasError {
        AtlasError::InvalidCrewInput(format!("Tópico não suportado: '{topic}'."))
    }

    /// Summary line of the report for `topic`
    pub fn summary_for(topic: &str) -> String {
        format!("Resultado placeholder para a análise do tópico '{topic}'.")
    }

    fn report(topic: &str) -> CrewOutcome {
        let result = json!({
            "summary": Self::summary_for(topic),
            "details": "Esta é uma resposta simulada pela crew placeholder.",
            "confidence": PLACEHOLDER_CONFIDENCE,
        });

        let logs = vec![
            format!("INFO: Crew para '{topic}' iniciada."),
            "DEBUG: Agente Pesquisador buscando...".to_string(),
            "DEBUG: Agente Escritor formatando...".to_string(),
            format!("INFO: Crew para '{topic}' finalizada."),
        ];

        CrewOutcome { result, logs }
    }
}

#[async_trait::async_trait]
impl CrewRunner for PlaceholderCrew {
    async fn run(&self, topic: &str, parameters: &Map<String, Value>) -> Result<CrewOutcome> {
        tracing::info!(topic, ?parameters, "Starting placeholder crew");
        tokio::time::sleep(self.latency).await;

        let outcome = Self::report(topic);
        tracing::info!(topic, "Placeholder crew finished");
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}
