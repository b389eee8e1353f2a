//! OpenAI chat completions adapter
//!
//! Streams completions from the OpenAI API. Two stream variants are
//! exposed, mirroring the two OpenAI-backed endpoints: an eventsource-based
//! decoder and a raw variant that reassembles SSE lines by hand.

use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{sse::LineBuffer, TextStream};
use crate::{
    chat::ChatRequest,
    config::Config,
    error::{AppError, AppResult},
};

/// OpenAI streaming client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// One SSE payload of a streamed chat completion
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    delta: ChatDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChatDelta {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }

    /// Stream a chat completion, decoding SSE events with eventsource-stream.
    pub async fn stream_chat(&self, request: &ChatRequest) -> AppResult<TextStream> {
        let response = self.open_stream(request).await?;

        let stream = async_stream::stream! {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        if event.data.trim() == "[DONE]" {
                            break;
                        }
                        if let Some(text) = delta_text(&event.data) {
                            yield Ok(text);
                        }
                    }
                    Err(e) => {
                        yield Err(AppError::UpstreamError(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    /// Stream a chat completion, reassembling SSE lines by hand.
    ///
    /// Equivalent output to [`stream_chat`]; kept as a separate path for
    /// the endpoint that exposes the raw-fetch behavior.
    pub async fn stream_chat_raw(&self, request: &ChatRequest) -> AppResult<TextStream> {
        let response = self.open_stream(request).await?;

        let stream = async_stream::stream! {
            let mut bytes = response.bytes_stream();
            let mut buffer = LineBuffer::new();
            'outer: while let Some(chunk) = bytes.next().await {
                match chunk {
                    Ok(chunk) => {
                        for line in buffer.feed(&chunk) {
                            let Some(data) = line.strip_prefix("data: ") else {
                                continue;
                            };
                            if data.trim() == "[DONE]" {
                                break 'outer;
                            }
                            if let Some(text) = delta_text(data) {
                                yield Ok(text);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(AppError::from(e));
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }

    /// Open the streaming completion request and verify the response status.
    async fn open_stream(&self, request: &ChatRequest) -> AppResult<reqwest::Response> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("OPENAI_API_KEY is not configured".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %request.model(), "Opening OpenAI completion stream");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&chat_payload(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "OpenAI API error {}: {}",
                status, text
            )));
        }

        Ok(response)
    }
}

/// Build the chat completions payload.
///
/// The system prompt rides as the first message; conversation roles pass
/// through verbatim since the vendor shares our role vocabulary.
fn chat_payload(request: &ChatRequest) -> Value {
    let mut messages = vec![json!({
        "role": "system",
        "content": request.system_prompt(),
    })];
    for message in &request.messages {
        messages.push(json!({
            "role": message.role,
            "content": message.content,
        }));
    }

    json!({
        "model": request.model(),
        "messages": messages,
        "max_tokens": request.max_tokens(),
        "temperature": request.temperature,
        "stream": true,
    })
}

/// Pull the text delta out of one streamed chunk payload, if it carries one.
fn delta_text(data: &str) -> Option<String> {
    match serde_json::from_str::<ChatChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content),
        Err(e) => {
            warn!(error = %e, data_len = data.len(), "Skipping unparseable OpenAI stream chunk");
            None
        }
    }
}
