use axum::{
    extract::State,
    http::{self, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use chatbridge::{
    models::message::IncomingMessage, providers::openrouter::OpenRouterProvider,
    reply::ReplyHandler,
};
use futures::{stream::StreamExt, Stream};
use serde_json::json;
use std::{
    convert::Infallible,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::state::AppState;

// SSE response type wrapping the fragment channel
pub struct SseResponse {
    rx: ReceiverStream<String>,
}

impl SseResponse {
    fn new(rx: ReceiverStream<String>) -> Self {
        Self { rx }
    }
}

impl Stream for SseResponse {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx)
            .poll_next(cx)
            .map(|opt| opt.map(|s| Ok(Bytes::from(s))))
    }
}

impl IntoResponse for SseResponse {
    fn into_response(self) -> axum::response::Response {
        let stream = self;
        let body = axum::body::Body::from_stream(stream);

        http::Response::builder()
            .header("Content-Type", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .header("Connection", "keep-alive")
            .body(body)
            .unwrap()
    }
}

// Outbound event formatting: each fragment is a `text` event carrying
// JSON, and the stream closes with a `done` event.
struct EventFormatter;

impl EventFormatter {
    fn format_text(text: &str) -> String {
        let payload = json!({ "text": text });
        format!("event: text\ndata: {}\n\n", payload)
    }

    fn format_done() -> String {
        "event: done\ndata: {}\n\n".to_string()
    }
}

async fn handler(
    State(state): State<AppState>,
    Json(message): Json<IncomingMessage>,
) -> Result<SseResponse, StatusCode> {
    tracing::debug!(
        attachments = message.attachments.len(),
        "handling reply request"
    );

    // Create channel for streaming
    let (tx, rx) = mpsc::channel(100);
    let stream = ReceiverStream::new(rx);

    let provider = OpenRouterProvider::new(state.openrouter.clone())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let bot = ReplyHandler::new(provider);

    // Spawn task to drain the pipeline into the channel
    tokio::spawn(async move {
        let mut fragments = bot.reply(message);

        while let Some(fragment) = fragments.next().await {
            if tx
                .send(EventFormatter::format_text(&fragment))
                .await
                .is_err()
            {
                // Client went away; dropping the stream drops the
                // upstream connection with it.
                tracing::debug!("client disconnected mid-stream");
                return;
            }
        }

        let _ = tx.send(EventFormatter::format_done()).await;
    });

    Ok(SseResponse::new(stream))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reply", post(handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text_escapes_json() {
        let event = EventFormatter::format_text("line one\nline \"two\"");
        assert!(event.starts_with("event: text\ndata: "));
        assert!(event.ends_with("\n\n"));
        // The payload itself must stay a single line of valid JSON
        let data = event
            .trim_start_matches("event: text\ndata: ")
            .trim_end();
        let parsed: serde_json::Value = serde_json::from_str(data).unwrap();
        assert_eq!(parsed["text"], "line one\nline \"two\"");
    }

    #[test]
    fn test_format_done() {
        assert_eq!(EventFormatter::format_done(), "event: done\ndata: {}\n\n");
    }
}
