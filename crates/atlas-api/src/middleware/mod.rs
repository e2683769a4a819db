//! HTTP middleware
//!
//! Author: hephaex@gmail.com

pub mod cors;
pub mod panic;

pub use cors::cors_layer;
pub use panic::handle_panic;
