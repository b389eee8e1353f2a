//! Outbound SSE framing and the stream relay
//!
//! Converts a provider-agnostic sequence of text/error items into the
//! uniform event stream sent to the caller: one `data: {json}` frame per
//! item, terminated unconditionally by the `data: [DONE]` sentinel.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;

use crate::error::AppError;

/// One increment of a relayed response: a text fragment or an error message.
///
/// Serializes externally tagged, so the wire form is `{"text": "..."}` or
/// `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreamChunk {
    /// A fragment of generated text
    Text(String),
    /// An upstream failure surfaced in-band
    Error(String),
}

/// Format a stream chunk as an SSE data event: `data: {json}\n\n`
pub fn sse_data(chunk: &StreamChunk) -> Bytes {
    let json = serde_json::to_string(chunk).expect("StreamChunk should always serialize");
    Bytes::from(format!("data: {}\n\n", json))
}

/// The SSE terminal frame: `data: [DONE]\n\n`
pub fn sse_done() -> Bytes {
    Bytes::from_static(b"data: [DONE]\n\n")
}

/// Relay an upstream text stream as SSE frames.
///
/// For each upstream item:
/// - non-empty text becomes one `{"text": ...}` frame;
/// - empty text is skipped, never forwarded as an empty write;
/// - the first error becomes one `{"error": ...}` frame and stops
///   consumption (no retry, no unclean abort).
///
/// Exactly one `[DONE]` frame is emitted at the end in every outcome:
/// success, upstream error, or an upstream that produced nothing. Frames
/// are yielded in upstream order, one at a time, so each write reaches the
/// transport before the next unit is pulled.
pub fn relay<S>(upstream: S) -> impl Stream<Item = Bytes> + Send
where
    S: Stream<Item = Result<String, AppError>> + Send + 'static,
{
    async_stream::stream! {
        futures::pin_mut!(upstream);
        while let Some(item) = upstream.next().await {
            match item {
                Ok(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    yield sse_data(&StreamChunk::Text(text));
                }
                Err(e) => {
                    yield sse_data(&StreamChunk::Error(e.to_string()));
                    break;
                }
            }
        }
        yield sse_done();
    }
}

/// Build the SSE response around a relayed stream.
///
/// Sets the event-stream content type, disables caching and proxy
/// buffering, and keeps the connection alive. Committing these headers is
/// the point after which failures are downgraded to in-band error chunks.
pub fn sse_response<S>(upstream: S) -> Response
where
    S: Stream<Item = Result<String, AppError>> + Send + 'static,
{
    let frames = relay(upstream).map(Ok::<_, Infallible>);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .body(Body::from_stream(frames))
        .expect("static header set should always build")
}
