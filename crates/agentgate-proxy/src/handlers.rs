//! Route handlers for the OpenAI-compatible endpoints.

use agentgate_core::{AgentRequest, BridgeError, Message, translate_messages};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::error::error_response;
use crate::models::{ChatCompletionRequest, CompletionRequest, ErrorResponse, ModelsResponse};
use crate::response::{
    CompletionKind, ResponseStamp, StreamFramer, chat_completion, text_completion,
};
use crate::server::AppState;
use crate::stream::stream_response;

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// List the single configured model in OpenAI format.
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    debug!("GET /v1/models");
    Json(ModelsResponse::single(&state.model, state.started_at))
}

/// Handle chat completions by running the agent over the message history.
pub async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    debug!("POST /v1/chat/completions");

    let request: ChatCompletionRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let messages = match request.validated_messages() {
        Ok(messages) => messages,
        Err(e) => return error_response(&e),
    };
    let history = translate_messages(messages);

    let model = state.resolve_model(request.model.as_deref());
    let streaming = request.is_streaming();
    let agent_request = AgentRequest::new(history, request.session_id.clone(), streaming);

    info!(
        model = %model,
        streaming,
        messages = messages.len(),
        session_id = %agent_request.session_id,
        "Processing chat completion request"
    );

    if streaming {
        let framer = StreamFramer::new(CompletionKind::Chat, model);
        return stream_response(state.runner.clone(), agent_request, framer);
    }

    let stamp = ResponseStamp::now(CompletionKind::Chat);
    match state.runner.run(agent_request, None).await {
        Ok(reply) => Json(chat_completion(&stamp, &model, reply.text, reply.session_id))
            .into_response(),
        Err(e) => agent_failure(&e),
    }
}

/// Handle legacy text completions by sending the prompt as one user message.
pub async fn completions(State(state): State<AppState>, body: Bytes) -> Response {
    debug!("POST /v1/completions");

    let request: CompletionRequest = match parse_body(&body) {
        Ok(req) => req,
        Err(response) => return response,
    };

    let prompt: Message = match request.validated_prompt() {
        Ok(prompt) => prompt,
        Err(e) => return error_response(&e),
    };
    let history = translate_messages(std::slice::from_ref(&prompt));

    let model = state.resolve_model(request.model.as_deref());
    let streaming = request.is_streaming();
    let agent_request = AgentRequest::new(history, None, streaming);

    info!(
        model = %model,
        streaming,
        session_id = %agent_request.session_id,
        "Processing text completion request"
    );

    if streaming {
        let framer = StreamFramer::new(CompletionKind::Text, model);
        return stream_response(state.runner.clone(), agent_request, framer);
    }

    let stamp = ResponseStamp::now(CompletionKind::Text);
    match state.runner.run(agent_request, None).await {
        Ok(reply) => Json(text_completion(&stamp, &model, reply.text)).into_response(),
        Err(e) => agent_failure(&e),
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        debug!("Failed to parse request: {e}");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_request(format!(
                "Invalid request body: {e}"
            ))),
        )
            .into_response()
    })
}

fn agent_failure(err: &BridgeError) -> Response {
    if err.is_client_error() {
        debug!(error = %err, "Agent run ended by client");
    } else {
        error!(error = %err, "Agent run failed");
    }
    error_response(err)
}
