//! Server-sent event responses fed by a running agent.
//!
//! The agent runs on its own task and pushes text increments through a
//! bounded channel. The response body drains that channel into SSE frames,
//! then reports the run's outcome and terminates with `[DONE]`. Dropping the
//! body closes the channel, which the session treats as a cancellation.

use std::convert::Infallible;
use std::sync::Arc;

use agentgate_core::{AgentRequest, AgentRunner};
use axum::{
    body::Body,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::response::{CompletionKind, SSE_DONE, StreamFramer};

/// Capacity of the increment channel between the agent and the SSE writer.
const INCREMENT_BUFFER: usize = 64;

/// Header exposing the agent session id on streamed chat responses.
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Run the agent and stream its output as SSE.
pub fn stream_response(
    runner: Arc<dyn AgentRunner>,
    request: AgentRequest,
    mut framer: StreamFramer,
) -> Response {
    let session_id = request.session_id.clone();
    let kind = framer.kind();
    let (tx, mut rx) = mpsc::channel::<String>(INCREMENT_BUFFER);

    let task = tokio::spawn(async move { runner.run(request, Some(tx)).await });

    let frames = async_stream::stream! {
        while let Some(increment) = rx.recv().await {
            yield Ok::<_, Infallible>(Bytes::from(framer.content(&increment)));
        }

        match task.await {
            Ok(Ok(reply)) => {
                debug!(
                    session_id = %reply.session_id,
                    chars = reply.text.chars().count(),
                    "Stream complete"
                );
                yield Ok(Bytes::from(framer.finish()));
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Agent failed mid-stream");
                yield Ok(Bytes::from(framer.error(&e.to_string())));
            }
            Err(e) => {
                error!(error = %e, "Agent task panicked");
                yield Ok(Bytes::from(framer.error("internal error")));
            }
        }

        yield Ok(Bytes::from_static(SSE_DONE.as_bytes()));
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("x-accel-buffering", "no");
    if kind == CompletionKind::Chat {
        // Opaque ids that are not valid header values are not echoed.
        match HeaderValue::from_str(&session_id) {
            Ok(value) => builder = builder.header(SESSION_ID_HEADER, value),
            Err(_) => debug!(session_id = ?session_id, "Session id not representable as a header"),
        }
    }

    builder
        .body(Body::from_stream(frames))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
