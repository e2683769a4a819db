//! Panic recovery
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use axum::response::{IntoResponse, Response};
use std::any::Any;

/// Turn a handler panic into an opaque 500 response
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    AppError::Internal("Internal server error".to_string()).into_response()
}
