//! Axum HTTP server for the OpenAI-compatible bridge.
//!
//! This module provides the `serve()` function that runs the server on a
//! pre-bound `TcpListener` until its cancellation token fires.

use std::sync::Arc;

use agentgate_core::AgentRunner;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use chrono::Utc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::handlers;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Model id reported when a request names none.
pub const DEFAULT_MODEL: &str = "claude-code";

/// CORS configuration for the server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// HTTP-side configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Model id echoed in responses and listed by `/v1/models`.
    pub model: String,
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Restrict CORS to specific origins. An empty list keeps the default.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        if !origins.is_empty() {
            self.cors = CorsConfig::AllowOrigins(origins);
        }
        self
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Runs one agent invocation per request.
    pub runner: Arc<dyn AgentRunner>,
    /// Configured model id.
    pub model: String,
    /// Unix seconds at startup, reported as the model's creation time.
    pub started_at: i64,
}

impl AppState {
    pub fn new(runner: Arc<dyn AgentRunner>, model: impl Into<String>) -> Self {
        Self {
            runner,
            model: model.into(),
            started_at: Utc::now().timestamp(),
        }
    }

    /// The request's model name, or the configured one.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        requested
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(self.model.as_str())
            .to_string()
    }
}

/// Build CORS layer based on configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build the router with all endpoints.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/models", get(handlers::list_models))
        .route("/v1/chat/completions", post(handlers::chat_completions))
        .route("/v1/completions", post(handlers::completions))
        .layer(build_cors_layer(cors))
        .with_state(state)
}

/// Start the server with a pre-bound listener.
///
/// Runs until the cancellation token is triggered, then drains in-flight
/// requests.
pub async fn serve(
    listener: TcpListener,
    config: &ServerConfig,
    runner: Arc<dyn AgentRunner>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let state = AppState::new(runner, config.model.clone());
    let app = create_router(state, &config.cors);

    info!(model = %config.model, "Listening on {addr}");
    info!("Configure clients to use: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Server shut down");
    Ok(())
}
