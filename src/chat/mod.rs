//! Chat request types and defaulting policy
//!
//! Defines the normalized request shape shared by every endpoint, and the
//! per-endpoint defaulting rules applied before a request enters the
//! truncate-and-relay pipeline.

pub mod truncate;

use serde::{Deserialize, Serialize};

/// System prompt used when the request does not carry one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, friendly, assistant.";

/// Token budget used when the request does not carry one (or carries zero)
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Role of a message participant
///
/// A closed enum: requests carrying any other role string are rejected at
/// decode time rather than silently coerced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing instructions or context
    System,
    /// User message from the human
    User,
    /// Assistant message from the AI
    Assistant,
}

/// A chat message with role and content
///
/// Immutable once constructed; ordering within a conversation is
/// chronological and meaningful.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The role of the message author
    pub role: Role,
    /// The content of the message
    pub content: String,
}

/// Normalized chat request accepted by every endpoint
///
/// Field names on the wire are camelCase (`systemPrompt`, `maxTokens`),
/// matching the client contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Messages in the conversation, oldest first
    pub messages: Vec<Message>,
    /// Model identifier; defaulted per endpoint when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// System prompt; defaulted when absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: f32,
    /// Maximum tokens to generate; zero counts as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Apply per-endpoint defaults, returning the defaulted request.
    ///
    /// The rules are independent and the function is total and idempotent:
    /// applying it twice with the same endpoint yields the same request.
    pub fn with_defaults(mut self, endpoint: Endpoint) -> Self {
        if self.system_prompt.as_deref().map_or(true, str::is_empty) {
            self.system_prompt = Some(DEFAULT_SYSTEM_PROMPT.to_string());
        }
        if self.max_tokens.unwrap_or(0) == 0 {
            self.max_tokens = Some(DEFAULT_MAX_TOKENS);
        }
        if self.model.as_deref().map_or(true, str::is_empty) {
            self.model = Some(endpoint.default_model().to_string());
        }
        self
    }

    /// Model identifier, empty if defaults were never applied
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_default()
    }

    /// System prompt, empty if defaults were never applied
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or_default()
    }

    /// Token budget, zero if defaults were never applied
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(0)
    }
}

/// The provider/backend combinations this gateway exposes
///
/// A closed enum: every route handler names its endpoint statically, so an
/// unrecognized endpoint identifier is unrepresentable (unknown paths 404
/// at the router).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// OpenAI chat completions, raw SSE line parsing
    OpenAiFetch,
    /// OpenAI chat completions, eventsource decoding
    OpenAiSdk,
    /// Anthropic Messages API
    AnthropicSdk,
    /// Vertex-AI-hosted Gemini
    GeminiSdk,
}

impl Endpoint {
    /// The route segment this endpoint is served under
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::OpenAiFetch => "openai-fetch",
            Endpoint::OpenAiSdk => "openai-sdk",
            Endpoint::AnthropicSdk => "anthropic-sdk",
            Endpoint::GeminiSdk => "gemini-sdk",
        }
    }

    /// Model used when the request does not name one
    pub fn default_model(self) -> &'static str {
        match self {
            Endpoint::OpenAiFetch => "gpt-3.5-turbo",
            Endpoint::OpenAiSdk => "gpt-4o",
            Endpoint::AnthropicSdk => "claude-3-5-sonnet-20241022",
            Endpoint::GeminiSdk => "gemini-2.0-flash",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
