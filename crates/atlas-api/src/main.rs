//! Atlas API Server
//!
//! REST API server for the Atlas AI services.
//!
//! Author: hephaex@gmail.com

use atlas_api::{create_router, state::AppState};
use atlas_core::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Neither file overrides variables that are already set
    dotenvy::dotenv().ok();
    dotenvy::from_filename(".env.local").ok();

    // Load configuration
    let config = match std::env::var("ATLAS_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);
    log_key_checks(&config);

    let addr = config.server.bind_address();

    // Create application state
    let state = Arc::new(AppState::new(config));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Atlas API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Atlas API shut down");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Credentials are only reported, the placeholder services never use them
fn log_key_checks(config: &AppConfig) {
    let openai = config.keys.openai_key_present();
    let supabase = config.keys.supabase_connection_present();
    tracing::info!(openai_key = openai, supabase_conn = supabase, "Key check");

    if !openai {
        tracing::warn!("OPENAI_API_KEY missing or too short");
    }
    if !supabase {
        tracing::warn!("SUPABASE_DB_CONNECTION_STRING missing or not a postgres URL");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
