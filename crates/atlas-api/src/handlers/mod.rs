//! API handlers
//!
//! Author: hephaex@gmail.com

pub mod crew;
pub mod guardrails;
pub mod health;
pub mod rag;
