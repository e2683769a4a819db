//! Application state management
//!
//! Author: hephaex@gmail.com

use atlas_core::config::AppConfig;
use atlas_core::{CrewRunner, KnowledgeBase, StructuredGenerator};
use atlas_crew::PlaceholderCrew;
use atlas_guardrails::PlaceholderGuard;
use atlas_rag::PlaceholderKnowledgeBase;
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// RAG knowledge base
    pub knowledge_base: Arc<dyn KnowledgeBase>,
    /// Crew runner
    pub crew: Arc<dyn CrewRunner>,
    /// Structured generator
    pub generator: Arc<dyn StructuredGenerator>,
}

impl AppState {
    /// Create new application state backed by the placeholder services
    pub fn new(config: AppConfig) -> Self {
        let services = &config.services;
        let knowledge_base = Arc::new(PlaceholderKnowledgeBase::from_config(services));
        let crew = Arc::new(PlaceholderCrew::from_config(services));
        let generator = Arc::new(PlaceholderGuard::from_config(services));

        Self {
            config,
            knowledge_base,
            crew,
            generator,
        }
    }

    /// Replace the knowledge base
    pub fn with_knowledge_base(mut self, knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        self.knowledge_base = knowledge_base;
        self
    }

    /// Replace the crew runner
    pub fn with_crew(mut self, crew: Arc<dyn CrewRunner>) -> Self {
        self.crew = crew;
        self
    }

    /// Replace the structured generator
    pub fn with_generator(mut self, generator: Arc<dyn StructuredGenerator>) -> Self {
        self.generator = generator;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
