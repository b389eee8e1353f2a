//! Configuration management for Switchboard
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use tracing::warn;

/// Default character budget for conversation history forwarded upstream
pub const DEFAULT_CHAR_LIMIT: usize = 12_000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// OpenAI API base URL
    pub openai_api_url: String,
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API base URL
    pub anthropic_api_url: String,
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Vertex AI base URL (derived from the location unless overridden)
    pub vertex_api_url: String,
    /// Google Cloud project hosting the Vertex models
    pub google_project_id: Option<String>,
    /// Vertex AI location (region)
    pub google_location: String,
    /// Opaque bearer token for Vertex AI, sourced externally
    /// (e.g. `gcloud auth print-access-token`)
    pub google_access_token: Option<String>,

    /// Character budget for conversation history
    pub char_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Vertex AI rejects the 'global' pseudo-location; fall back to a
        // concrete region like the original deployment did.
        let mut google_location =
            env::var("GOOGLE_LOCATION").unwrap_or_else(|_| "us-central1".to_string());
        if google_location == "global" {
            warn!("'global' is not a valid Vertex AI location, using 'us-central1' instead");
            google_location = "us-central1".to_string();
        }

        let vertex_api_url = env::var("VERTEX_API_URL").unwrap_or_else(|_| {
            format!("https://{}-aiplatform.googleapis.com", google_location)
        });

        Ok(Self {
            host: env::var("SWITCHBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("SWITCHBOARD_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid SWITCHBOARD_PORT")?,

            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),

            anthropic_api_url: env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),

            vertex_api_url,
            google_project_id: env::var("GOOGLE_PROJECT_ID").ok(),
            google_location,
            google_access_token: env::var("GOOGLE_ACCESS_TOKEN").ok(),

            char_limit: match env::var("SWITCHBOARD_CHAR_LIMIT") {
                Ok(raw) => raw.parse().context("Invalid SWITCHBOARD_CHAR_LIMIT")?,
                Err(_) => DEFAULT_CHAR_LIMIT,
            },
        })
    }
}
