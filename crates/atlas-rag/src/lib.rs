//! Atlas RAG - Retrieval-Augmented Generation knowledge base
//!
//! The knowledge base answers questions from indexed documents. Retrieval,
//! embedding and generation are not wired in yet: the placeholder below
//! recognises a few keywords and answers with canned text after a short
//! simulated delay.
//!
//! Author: hephaex@gmail.com

use atlas_core::{
    AtlasError, IndexReport, KnowledgeBase, RagAnswer, Result, ServicesConfig, SourceRecord,
};
use serde_json::json;
use std::time::Duration;

// ============================================================================
// Canned Answers
// ============================================================================

pub const SUPABASE_ANSWER: &str = "Supabase é um Backend como Serviço (BaaS) incrível!";
pub const TEST_ANSWER: &str = "Este é um teste do serviço RAG placeholder.";
pub const FALLBACK_ANSWER: &str =
    "Desculpe, não encontrei informações sobre isso no meu conhecimento atual (placeholder).";

const SUPABASE_SOURCE: &str = "docs/supabase_intro.md";
const SUPABASE_SCORE: f64 = 0.9;

/// Documents reported by a placeholder indexing run
const PLACEHOLDER_INDEXED_COUNT: usize = 10;

// ============================================================================
// Configuration
// ============================================================================

/// Simulated latency of each operation
#[derive(Debug, Clone)]
pub struct KnowledgeBaseConfig {
    /// Delay before a query is answered
    pub query_latency: Duration,

    /// Delay of a full load-and-index run
    pub index_latency: Duration,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            query_latency: Duration::from_millis(200),
            index_latency: Duration::from_millis(500),
        }
    }
}

impl KnowledgeBaseConfig {
    /// Configuration with every delay removed
    pub fn instant() -> Self {
        Self {
            query_latency: Duration::ZERO,
            index_latency: Duration::ZERO,
        }
    }
}

// ============================================================================
// Placeholder Knowledge Base
// ============================================================================

/// Keyword-matching stand-in for the vector store backed knowledge base
#[derive(Debug, Clone, Default)]
pub struct PlaceholderKnowledgeBase {
    config: KnowledgeBaseConfig,
}

impl PlaceholderKnowledgeBase {
    pub fn new(config: KnowledgeBaseConfig) -> Self {
        Self { config }
    }

    /// Knowledge base that sleeps only when `simulate_latency` is set
    pub fn from_config(services: &ServicesConfig) -> Self {
        if services.simulate_latency {
            Self::new(KnowledgeBaseConfig::default())
        } else {
            Self::new(KnowledgeBaseConfig::instant())
        }
    }

    /// Error reported when the vector store has not been loaded
    pub fn not_ready() -> AtlasError {
        AtlasError::VectorStoreNotReady("Base de vetores indisponível.".to_string())
    }

    fn answer_for(question: &str) -> RagAnswer {
        let question = question.to_lowercase();

        if question.contains("supabase") {
            tracing::debug!("Placeholder knowledge base matched 'supabase'");
            let mut source = SourceRecord::new();
            source.insert("source".to_string(), json!(SUPABASE_SOURCE));
            source.insert("score".to_string(), json!(SUPABASE_SCORE));
            RagAnswer {
                answer: SUPABASE_ANSWER.to_string(),
                sources: vec![source],
            }
        } else if question.contains("teste") {
            tracing::debug!("Placeholder knowledge base matched 'teste'");
            RagAnswer::unsourced(TEST_ANSWER)
        } else {
            tracing::debug!("Placeholder knowledge base found no answer");
            RagAnswer::unsourced(FALLBACK_ANSWER)
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeBase for PlaceholderKnowledgeBase {
    async fn query(&self, question: &str) -> Result<RagAnswer> {
        tracing::info!(question, "Processing placeholder RAG query");
        tokio::time::sleep(self.config.query_latency).await;
        Ok(Self::answer_for(question))
    }

    async fn load_and_index(&self) -> Result<IndexReport> {
        tracing::info!("Loading and indexing documents (placeholder)");
        tokio::time::sleep(self.config.index_latency).await;

        let report = IndexReport {
            status: "success".to_string(),
            indexed_count: PLACEHOLDER_INDEXED_COUNT,
        };
        tracing::info!(indexed = report.indexed_count, "Documents indexed");
        Ok(report)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

// ============================================================================
// Tests
// ============================================================================
