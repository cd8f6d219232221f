//! OpenAI-compatible HTTP adapter for agentgate.
//!
//! Serves `/v1/chat/completions`, `/v1/completions`, `/v1/models` and
//! `/health`, delegating each completion to an [`agentgate_core::AgentRunner`].

#![deny(unsafe_code)]

pub mod error;
pub mod handlers;
pub mod models;
pub mod response;
pub mod server;
pub mod stream;

pub use server::{AppState, CorsConfig, DEFAULT_MODEL, DEFAULT_PORT, ServerConfig, create_router, serve};
