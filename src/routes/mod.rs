//! HTTP routes for Switchboard
//!
//! This module defines all HTTP endpoints exposed by the gateway.

pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // The gateway fronts browser clients, so CORS stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/openai-fetch", post(chat::openai_fetch))
        .route("/openai-sdk", post(chat::openai_sdk))
        .route("/anthropic-sdk", post(chat::anthropic_sdk))
        .route("/gemini-sdk", post(chat::gemini_sdk))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root info endpoint
async fn root() -> Json<Value> {
    Json(json!({ "message": "Switchboard chat gateway" }))
}
