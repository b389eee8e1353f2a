//! Chat endpoints
//!
//! One handler per provider/backend combination. Every handler runs the
//! same pipeline: decode the request, apply the endpoint's defaults,
//! truncate the history to the character budget, open the provider stream,
//! and relay it as SSE. All per-request state flows through these explicit
//! stages; nothing is shared across invocations.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use tracing::info;

use crate::{
    chat::{truncate::truncate, ChatRequest, Endpoint},
    error::{AppError, AppResult},
    streaming::sse_response,
    AppState,
};

/// OpenAI chat completions, raw SSE line parsing
pub async fn openai_fetch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = prepare(payload, Endpoint::OpenAiFetch, &state)?;
    let stream = state.openai.stream_chat_raw(&request).await?;
    Ok(sse_response(stream))
}

/// OpenAI chat completions, eventsource decoding
pub async fn openai_sdk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = prepare(payload, Endpoint::OpenAiSdk, &state)?;
    let stream = state.openai.stream_chat(&request).await?;
    Ok(sse_response(stream))
}

/// Anthropic Messages API
pub async fn anthropic_sdk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = prepare(payload, Endpoint::AnthropicSdk, &state)?;
    let stream = state.anthropic.stream_chat(&request).await?;
    Ok(sse_response(stream))
}

/// Vertex-AI-hosted Gemini
pub async fn gemini_sdk(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Response> {
    let request = prepare(payload, Endpoint::GeminiSdk, &state)?;
    let stream = state.vertex.stream_chat(&request).await?;
    Ok(sse_response(stream))
}

/// Shared front half of every handler: decode, default, truncate.
///
/// Decode failures reject with a client error before any processing; from
/// here on the request is immutable pipeline input.
fn prepare(
    payload: Result<Json<ChatRequest>, JsonRejection>,
    endpoint: Endpoint,
    state: &AppState,
) -> AppResult<ChatRequest> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut request = request.with_defaults(endpoint);
    let before = request.messages.len();
    request.messages = truncate(request.messages, state.config.char_limit);

    info!(
        endpoint = %endpoint,
        model = %request.model(),
        messages = request.messages.len(),
        truncated = before - request.messages.len(),
        "Processing chat request"
    );

    Ok(request)
}
