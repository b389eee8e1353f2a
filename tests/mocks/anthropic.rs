//! Mock Anthropic Messages endpoint
//!
//! Serves `POST /v1/messages` with canned SSE event sequences matching the
//! real API's event taxonomy.

use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants;

fn event(name: &str, data: serde_json::Value) -> String {
    format!("event: {}\ndata: {}\n\n", name, data)
}

/// Build a full message stream from text fragments.
pub fn stream_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    body.push_str(&event(
        "message_start",
        json!({"type": "message_start", "message": {"id": "msg_test", "role": "assistant", "content": []}}),
    ));
    body.push_str(&event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
    ));
    for fragment in fragments {
        body.push_str(&event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": fragment}}),
        ));
    }
    body.push_str(&event(
        "content_block_stop",
        json!({"type": "content_block_stop", "index": 0}),
    ));
    body.push_str(&event(
        "message_delta",
        json!({"type": "message_delta", "delta": {"stop_reason": "end_turn"}}),
    ));
    body.push_str(&event("message_stop", json!({"type": "message_stop"})));
    body
}

/// Build a stream that fails in-band with the vendor's error event.
pub fn error_body(message: &str) -> String {
    event(
        "error",
        json!({"type": "error", "error": {"type": "overloaded_error", "message": message}}),
    )
}

/// Mount a successful message stream
pub async fn mock_stream(server: &MockServer, fragments: &[&str]) {
    mock_raw(server, stream_body(fragments)).await;
}

/// Mount an in-band error stream
pub async fn mock_stream_error(server: &MockServer, message: &str) {
    mock_raw(server, error_body(message)).await;
}

async fn mock_raw(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", constants::TEST_ANTHROPIC_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(server)
        .await;
}

/// Mount a non-success response (pre-stream upstream failure)
pub async fn mock_error(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(
                json!({"type": "error", "error": {"type": "api_error", "message": message}}),
            ),
        )
        .mount(server)
        .await;
}
