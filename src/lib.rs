//! Switchboard - streaming chat gateway
//!
//! This library provides the core functionality for the Switchboard
//! gateway: it accepts normalized chat requests and relays each provider's
//! incremental response back to the caller as an SSE stream.

pub mod chat;
pub mod config;
pub mod error;
pub mod providers;
pub mod routes;
pub mod streaming;

use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::providers::{
    anthropic::AnthropicClient, openai::OpenAiClient, vertex::VertexClient,
};

/// Application state shared across all request handlers
///
/// Immutable after construction; concurrent requests share only the
/// configuration and the pooled HTTP client inside the provider clients.
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    pub openai: OpenAiClient,
    pub anthropic: AnthropicClient,
    pub vertex: VertexClient,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        // One pooled HTTP client shared by every provider adapter
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(std::time::Duration::from_secs(300))
            .build()?;

        let openai = OpenAiClient::new(http_client.clone(), &config);
        let anthropic = AnthropicClient::new(http_client.clone(), &config);
        let vertex = VertexClient::new(http_client, &config);

        Ok(Self {
            config,
            start_time: Instant::now(),
            openai,
            anthropic,
            vertex,
        })
    }
}
