//! Cross-origin resource sharing policy
//!
//! Origins come from the server configuration. When none is usable every
//! origin is allowed by mirroring the request's `Origin`, since a literal
//! wildcard cannot be combined with credentials.
//!
//! Author: hephaex@gmail.com

use atlas_core::ServerConfig;
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build the CORS layer: credentials, all methods and all headers allowed
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        tracing::warn!("No CORS origin configured, allowing all origins");
        AllowOrigin::mirror_request()
    } else {
        tracing::info!(?origins, "CORS allowed origins");
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
