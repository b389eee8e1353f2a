//! Vertex AI Gemini adapter
//!
//! Streams generations from a Vertex-AI-hosted Gemini model via
//! `streamGenerateContent?alt=sse`. Roles map binarily onto Vertex's
//! `model`/`user` vocabulary and the system prompt rides as a
//! `systemInstruction`. The bearer token is opaque configuration sourced
//! outside this gateway.

use eventsource_stream::Eventsource;
use futures::{stream, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::TextStream;
use crate::{
    chat::{ChatRequest, Role},
    config::Config,
    error::{AppError, AppResult},
};

/// Vertex AI streaming client
pub struct VertexClient {
    client: reqwest::Client,
    base_url: String,
    project_id: Option<String>,
    location: String,
    access_token: Option<String>,
}

/// One streamed generation response
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl VertexClient {
    /// Create a new Vertex AI client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.vertex_api_url.clone(),
            project_id: config.google_project_id.clone(),
            location: config.google_location.clone(),
            access_token: config.google_access_token.clone(),
        }
    }

    /// Stream a generation.
    ///
    /// A request whose truncated history is empty yields an empty stream
    /// without calling upstream; the relay still terminates it with the
    /// done sentinel.
    pub async fn stream_chat(&self, request: &ChatRequest) -> AppResult<TextStream> {
        if request.messages.is_empty() {
            return Ok(Box::pin(stream::empty()));
        }

        let project_id = self.project_id.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("GOOGLE_PROJECT_ID is not configured".to_string())
        })?;
        let access_token = self.access_token.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("GOOGLE_ACCESS_TOKEN is not configured".to_string())
        })?;

        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent?alt=sse",
            self.base_url,
            project_id,
            self.location,
            request.model(),
        );
        debug!(url = %url, model = %request.model(), "Opening Vertex AI generation stream");

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&generate_payload(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamError(format!(
                "Vertex AI error {}: {}",
                status, text
            )));
        }

        let stream = async_stream::stream! {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                match event {
                    Ok(event) => {
                        for text in chunk_texts(&event.data) {
                            yield Ok(text);
                        }
                    }
                    Err(e) => {
                        yield Err(AppError::UpstreamError(e.to_string()));
                        break;
                    }
                }
            }
            // The SSE stream ending is the end-of-generation signal.
        };

        Ok(Box::pin(stream))
    }
}

/// Build the generateContent payload.
fn generate_payload(request: &ChatRequest) -> Value {
    let contents: Vec<Value> = request
        .messages
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::Assistant => "model",
                _ => "user",
            };
            json!({ "role": role, "parts": [{ "text": message.content }] })
        })
        .collect();

    json!({
        "contents": contents,
        "systemInstruction": { "parts": [{ "text": request.system_prompt() }] },
        "generationConfig": {
            "temperature": request.temperature,
            "maxOutputTokens": request.max_tokens(),
        },
    })
}

/// Collect the text parts of one streamed generation chunk.
fn chunk_texts(data: &str) -> Vec<String> {
    let chunk = match serde_json::from_str::<GenerateChunk>(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!(error = %e, data_len = data.len(), "Skipping unparseable Vertex stream chunk");
            return Vec::new();
        }
    };

    chunk
        .candidates
        .into_iter()
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .collect()
}
