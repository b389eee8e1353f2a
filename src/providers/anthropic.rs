//! Anthropic Messages API adapter
//!
//! Streams completions from Anthropic. The system prompt is a top-level
//! field rather than a message, and conversation roles map binarily:
//! `assistant` stays the model-authored role, everything else becomes the
//! user role.

use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::TextStream;
use crate::{
    chat::{ChatRequest, Role},
    config::Config,
    error::{AppError, AppResult},
};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic streaming client
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// One SSE payload of a streamed message, discriminated by its `type` field
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<EventDelta>,
    #[serde(default)]
    error: Option<EventError>,
}

#[derive(Debug, Deserialize)]
struct EventDelta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventError {
    message: String,
}

/// What one upstream event means for the relayed stream
#[derive(Debug, PartialEq)]
enum EventAction {
    Emit(String),
    Fail(String),
    Stop,
    Skip,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.anthropic_api_url.clone(),
            api_key: config.anthropic_api_key.clone(),
        }
    }

    /// Stream a message completion.
    pub async fn stream_chat(&self, request: &ChatRequest) -> AppResult<TextStream> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("ANTHROPIC_API_KEY is not configured".to_string())
        })?;

        let url = format!("{}/v1/messages", self.base_url);
        debug!(url = %url, model = %request.model(), "Opening Anthropic message stream");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&messages_payload(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "Anthropic API error {}: {}",
                status, text
            )));
        }

        let stream = async_stream::stream! {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => match classify_event(&event.data) {
                        EventAction::Emit(text) => yield Ok(text),
                        EventAction::Fail(message) => {
                            yield Err(AppError::UpstreamError(message));
                            break;
                        }
                        EventAction::Stop => break,
                        EventAction::Skip => {}
                    },
                    Err(e) => {
                        yield Err(AppError::UpstreamError(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Build the Messages API payload.
fn messages_payload(request: &ChatRequest) -> Value {
    let messages: Vec<Value> = request
        .messages
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::Assistant => "assistant",
                _ => "user",
            };
            json!({ "role": role, "content": message.content })
        })
        .collect();

    json!({
        "model": request.model(),
        "system": request.system_prompt(),
        "messages": messages,
        "max_tokens": request.max_tokens(),
        "temperature": request.temperature,
        "stream": true,
    })
}

/// Map one SSE payload onto a relay action.
///
/// `message_stop` is the typed end-of-stream marker; termination is never
/// inferred from an error's message text.
fn classify_event(data: &str) -> EventAction {
    let event = match serde_json::from_str::<StreamEvent>(data) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, data_len = data.len(), "Skipping unparseable Anthropic stream event");
            return EventAction::Skip;
        }
    };

    match event.kind.as_str() {
        "content_block_delta" => match event.delta.and_then(|delta| delta.text) {
            Some(text) => EventAction::Emit(text),
            None => EventAction::Skip,
        },
        "error" => {
            let message = event
                .error
                .map(|error| error.message)
                .unwrap_or_else(|| "unknown upstream error".to_string());
            EventAction::Fail(message)
        }
        "message_stop" => EventAction::Stop,
        // message_start, content_block_start/stop, ping, message_delta
        _ => EventAction::Skip,
    }
}
