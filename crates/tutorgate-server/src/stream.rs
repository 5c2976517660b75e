//! NDJSON streaming response encoder.
//!
//! Serializes a channel of [`StreamFragment`] values as newline-delimited
//! JSON, one object per line, delivered incrementally as fragments arrive.
//! An error fragment terminates the stream: it is written, then the body
//! ends, so clients never see text after an error.

use axum::body::{Body, Bytes};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio::sync::mpsc;
use tutorgate_types::StreamFragment;

/// Media type of the chat stream, distinct from plain JSON.
pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Build a streaming NDJSON response from a fragment channel.
///
/// Fragments are framed in arrival order with no additional buffering.
/// The channel closing ends the body; so does the first terminal fragment.
pub fn ndjson_response(mut rx: mpsc::Receiver<StreamFragment>) -> Response {
    let body_stream = async_stream::stream! {
        while let Some(fragment) = rx.recv().await {
            let terminal = fragment.is_terminal();
            if let Ok(line) = serde_json::to_string(&fragment) {
                yield Ok::<_, std::io::Error>(Bytes::from(format!("{line}\n")));
            }
            if terminal {
                break;
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(body_stream))
        .expect("response builder with valid status and headers")
}
