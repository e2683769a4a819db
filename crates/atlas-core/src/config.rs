//! Atlas Configuration Management
//!
//! Handles configuration from environment variables and TOML files,
//! with sensible defaults for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Placeholder service behavior
    pub services: ServicesConfig,

    /// Credentials for the future AI backends
    pub keys: KeysConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().apply(lookup)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply(|key| std::env::var(key).ok())
    }

    fn apply<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                value: port,
            })?;
        }
        if let Some(url) = lookup("NEXT_PUBLIC_SITE_URL") {
            self.server.site_url = url;
        }

        // Keys are only checked for presence, never enforced
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.keys.openai_api_key = Some(key);
        }
        if let Some(conn) = lookup("SUPABASE_DB_CONNECTION_STRING") {
            self.keys.supabase_db_connection_string = Some(conn);
        }

        // Services
        if let Some(value) = lookup("SIMULATE_LATENCY") {
            self.services.simulate_latency =
                parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                    key: "SIMULATE_LATENCY".to_string(),
                    value,
                })?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.json_format = match format.to_lowercase().as_str() {
                "json" => true,
                "pretty" | "text" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LOG_FORMAT".to_string(),
                        value: format,
                    })
                }
            };
        }

        Ok(self)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path prefix of the AI routes
    pub api_prefix: String,

    /// Frontend URL, first entry of the CORS allow-list
    pub site_url: String,

    /// Additional allowed origins for CORS
    pub extra_cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed CORS origins without blanks or duplicates.
    ///
    /// An empty list means every origin is allowed.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        for origin in std::iter::once(&self.site_url).chain(&self.extra_cors_origins) {
            let origin = origin.trim();
            if !origin.is_empty() && !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api/v1".to_string(),
            site_url: "http://localhost:3000".to_string(),
            // The API's own origin, for the docs UI
            extra_cors_origins: vec!["http://localhost:8000".to_string()],
        }
    }
}

/// Placeholder service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Sleep inside the placeholder services to mimic backend I/O
    pub simulate_latency: bool,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            simulate_latency: true,
        }
    }
}

/// Backend credentials
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeysConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Supabase PostgreSQL connection string
    pub supabase_db_connection_string: Option<String>,
}

impl KeysConfig {
    /// Whether an OpenAI key of plausible length is configured
    pub fn openai_key_present(&self) -> bool {
        self.openai_api_key
            .as_deref()
            .is_some_and(|key| key.len() > 5)
    }

    /// Whether a PostgreSQL connection string is configured
    pub fn supabase_connection_present(&self) -> bool {
        self.supabase_db_connection_string
            .as_deref()
            .is_some_and(|conn| conn.contains("postgres:"))
    }
}

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` gives a usable one
pub const DEFAULT_LOG_FILTER: &str = "info,atlas_api=debug,tower_http=debug";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_FILTER.to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
