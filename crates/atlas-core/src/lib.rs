//! Atlas Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout Atlas:
//! - Common error types
//! - Result types returned by the AI services
//! - Service traits for RAG, Crew and Guardrails backends
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, KeysConfig, LoggingConfig, ServerConfig, ServicesConfig,
    DEFAULT_LOG_FILTER,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Atlas service operations
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The retrieval backend has not finished loading
    #[error("{0}")]
    VectorStoreNotReady(String),

    /// The crew cannot run for the given topic or parameters
    #[error("{0}")]
    InvalidCrewInput(String),

    /// Generated output did not satisfy its specification.
    ///
    /// Recoverable: the API reports it inside a successful response.
    #[error("{0}")]
    GuardrailsValidation(String),

    /// The requested Guardrails specification does not exist
    #[error("{0}")]
    SpecNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

// ============================================================================
// RAG
// ============================================================================

/// Free-form description of a retrieved source (path, score, ...)
pub type SourceRecord = Map<String, Value>;

/// Answer produced by a knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Generated answer text
    pub answer: String,

    /// Sources the answer was grounded on
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
}

impl RagAnswer {
    /// Answer without any supporting source
    pub fn unsourced(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: Vec::new(),
        }
    }
}

/// Outcome of an indexing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    pub status: String,
    pub indexed_count: usize,
}

// ============================================================================
// Crew
// ============================================================================

/// Result and execution log of a crew run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOutcome {
    /// Final crew output, any JSON value
    pub result: Value,

    /// Execution log lines
    #[serde(default)]
    pub logs: Vec<String>,
}

// ============================================================================
// Guardrails
// ============================================================================

/// Validated output of a structured generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StructuredOutput {
    Object(Map<String, Value>),
    List(Vec<Value>),
    Text(String),
}

impl From<String> for StructuredOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// ============================================================================
// Service Traits
// ============================================================================

/// Trait for question-answering backends
#[async_trait::async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// Answer a question from the indexed knowledge
    async fn query(&self, question: &str) -> Result<RagAnswer>;

    /// Load source documents and index them
    async fn load_and_index(&self) -> Result<IndexReport>;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Trait for multi-agent task runners
#[async_trait::async_trait]
pub trait CrewRunner: Send + Sync {
    /// Run the crew that handles `topic`
    async fn run(&self, topic: &str, parameters: &Map<String, Value>) -> Result<CrewOutcome>;

    /// Get runner name for logging
    fn name(&self) -> &str;
}

/// Trait for schema-guided generators
#[async_trait::async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generate output for `prompt` and validate it against `spec_name`,
    /// re-asking the model at most `num_reasks` times.
    async fn generate(
        &self,
        prompt: &str,
        spec_name: &str,
        num_reasks: u32,
    ) -> Result<StructuredOutput>;

    /// Get generator name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
