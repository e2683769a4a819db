//! Liveness handlers
//!
//! Author: hephaex@gmail.com

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ROOT_MESSAGE: &str = "API de IA está operacional!";
pub const PING_MESSAGE: &str = "AI router está respondendo!";

/// Fixed liveness message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "API de IA está operacional!")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Root endpoint, checks that the API process is up
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API is running", body = MessageResponse)
    )
)]
pub async fn root() -> Json<MessageResponse> {
    tracing::info!("Root endpoint accessed");
    MessageResponse::new(ROOT_MESSAGE)
}

/// Checks that the AI router is mounted
#[utoipa::path(
    get,
    path = "/api/v1/ping",
    tag = "AI Services",
    responses(
        (status = 200, description = "AI router is responding", body = MessageResponse)
    )
)]
pub async fn ping() -> Json<MessageResponse> {
    tracing::debug!("AI router ping received");
    MessageResponse::new(PING_MESSAGE)
}
