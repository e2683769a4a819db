//! Atlas CLI - Command-line interface
//!
//! Usage:
//!   atlas rag <question>
//!   atlas crew <topic> [--param key=value]...
//!   atlas generate --spec <name> [--reasks N] <prompt>
//!   atlas index

use anyhow::Context;
use atlas_core::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use atlas_core::{CrewRunner, KnowledgeBase, StructuredGenerator};
use atlas_crew::PlaceholderCrew;
use atlas_guardrails::PlaceholderGuard;
use atlas_rag::PlaceholderKnowledgeBase;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Atlas AI services CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the knowledge base a question
    Rag {
        /// Question to ask
        question: String,
    },
    /// Run a crew of agents on a topic
    Crew {
        /// Topic or goal for the crew
        topic: String,
        /// Crew parameter as key=value; the value is parsed as JSON when possible
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },
    /// Generate structured data validated against a specification
    Generate {
        /// Prompt for the model
        prompt: String,
        /// Specification name (`.rail` file or schema name)
        #[arg(long)]
        spec: String,
        /// Number of correction attempts
        #[arg(long, default_value_t = 1)]
        reasks: u32,
    },
    /// Load and index documents into the knowledge base
    Index,
}

fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    let config = match std::env::var("ATLAS_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

fn log_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&config.logging))
        .with_writer(std::io::stderr)
        .init();

    let services = &config.services;

    match cli.command {
        Commands::Rag { question } => {
            let kb = PlaceholderKnowledgeBase::from_config(services);
            print_json(&kb.query(&question).await?)?;
        }
        Commands::Crew { topic, params } => {
            let parameters: Map<String, Value> = params.into_iter().collect();
            let outcome = PlaceholderCrew::from_config(services)
                .run(&topic, &parameters)
                .await?;
            print_json(&outcome)?;
        }
        Commands::Generate {
            prompt,
            spec,
            reasks,
        } => {
            let output = PlaceholderGuard::from_config(services)
                .generate(&prompt, &spec, reasks)
                .await?;
            print_json(&output)?;
        }
        Commands::Index => {
            let kb = PlaceholderKnowledgeBase::from_config(services);
            print_json(&kb.load_and_index().await?)?;
        }
    }

    Ok(())
}
