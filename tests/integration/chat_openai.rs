//! OpenAI endpoint integration tests
//!
//! Covers both OpenAI-backed endpoints: the eventsource-decoded
//! `/openai-sdk` and the raw line-parsed `/openai-fetch`.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{only_request_body, sse_frames, TestHarness};
use crate::mocks::openai;

fn simple_request() -> serde_json::Value {
    json!({
        "messages": [
            {"role": "user", "content": "Hello!"}
        ]
    })
}

#[tokio::test]
async fn test_openai_sdk_streams_text() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["Hello", " world"]).await;

    let response = harness.server.post("/openai-sdk").json(&simple_request()).await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-type").to_str().unwrap(),
        "text/event-stream"
    );
    assert_eq!(
        response.text(),
        "data: {\"text\":\"Hello\"}\n\ndata: {\"text\":\" world\"}\n\ndata: [DONE]\n\n"
    );
}

#[tokio::test]
async fn test_openai_fetch_streams_text() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["Hi", " there"]).await;

    let response = harness
        .server
        .post("/openai-fetch")
        .json(&simple_request())
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "data: {\"text\":\"Hi\"}\n\ndata: {\"text\":\" there\"}\n\ndata: [DONE]\n\n"
    );
}

#[tokio::test]
async fn test_empty_fragments_are_skipped() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["Hello", "", " world"]).await;

    let response = harness.server.post("/openai-sdk").json(&simple_request()).await;

    response.assert_status_ok();
    let body = response.text();
    let frames = sse_frames(&body);
    assert_eq!(
        frames,
        vec![
            "data: {\"text\":\"Hello\"}",
            "data: {\"text\":\" world\"}",
            "data: [DONE]",
        ]
    );
}

#[tokio::test]
async fn test_sdk_endpoint_applies_defaults_on_wire() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["ok"]).await;

    harness.server.post("/openai-sdk").json(&simple_request()).await;

    let body = only_request_body(&harness.openai).await;
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 800);
    assert_eq!(body["stream"], true);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(
        messages[0]["content"],
        "You are a helpful, friendly, assistant."
    );
    assert_eq!(messages[1]["role"], "user");
}

#[tokio::test]
async fn test_fetch_endpoint_defaults_to_turbo_model() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["ok"]).await;

    harness
        .server
        .post("/openai-fetch")
        .json(&simple_request())
        .await;

    let body = only_request_body(&harness.openai).await;
    assert_eq!(body["model"], "gpt-3.5-turbo");
}

#[tokio::test]
async fn test_explicit_fields_pass_through() {
    let harness = TestHarness::new().await;
    openai::mock_stream(&harness.openai, &["ok"]).await;

    harness
        .server
        .post("/openai-sdk")
        .json(&json!({
            "messages": [{"role": "user", "content": "Hello!"}],
            "model": "gpt-4-turbo",
            "systemPrompt": "Answer in French.",
            "maxTokens": 64,
            "temperature": 0.9
        }))
        .await;

    let body = only_request_body(&harness.openai).await;
    assert_eq!(body["model"], "gpt-4-turbo");
    assert_eq!(body["max_tokens"], 64);
    assert_eq!(body["messages"][0]["content"], "Answer in French.");
}

#[tokio::test]
async fn test_history_is_truncated_on_wire() {
    let harness = TestHarness::builder().char_limit(7).build().await;
    openai::mock_stream(&harness.openai, &["ok"]).await;

    // 4 + 8 chars: the second message overflows the budget and the walk
    // stops there, so only the first reaches upstream (plus the system
    // prompt, which is not part of the budget).
    harness
        .server
        .post("/openai-sdk")
        .json(&json!({
            "messages": [
                {"role": "user", "content": "aaaa"},
                {"role": "assistant", "content": "bbbbbbbb"},
                {"role": "user", "content": "cc"}
            ]
        }))
        .await;

    let body = only_request_body(&harness.openai).await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["content"], "aaaa");
}
