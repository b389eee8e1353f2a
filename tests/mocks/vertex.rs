//! Mock Vertex AI generation endpoint
//!
//! Serves `streamGenerateContent?alt=sse` for the test project with canned
//! generation chunks.

use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::common::constants;

/// Path the adapter is expected to call for a given model
pub fn model_path(model: &str) -> String {
    format!(
        "/v1/projects/{}/locations/{}/publishers/google/models/{}:streamGenerateContent",
        constants::TEST_GOOGLE_PROJECT,
        constants::TEST_GOOGLE_LOCATION,
        model,
    )
}

/// Build a generation stream from text fragments.
pub fn stream_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str(&format!(
            "data: {}\n\n",
            json!({"candidates": [{"content": {"role": "model", "parts": [{"text": fragment}]}}]})
        ));
    }
    body.push_str(&format!(
        "data: {}\n\n",
        json!({"candidates": [{"finishReason": "STOP"}]})
    ));
    body
}

/// Mount a successful generation stream for a model
pub async fn mock_stream(server: &MockServer, model: &str, fragments: &[&str]) {
    Mock::given(method("POST"))
        .and(path(model_path(model)))
        .and(query_param("alt", "sse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(stream_body(fragments), "text/event-stream"),
        )
        .mount(server)
        .await;
}

/// Mount a non-success response (pre-stream upstream failure)
pub async fn mock_error(server: &MockServer, model: &str, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path(model_path(model)))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({"error": {"code": status, "message": message}})),
        )
        .mount(server)
        .await;
}
