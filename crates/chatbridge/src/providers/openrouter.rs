use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{DeltaStream, Provider};
use super::configs::OpenRouterConfig;
use crate::errors::{truncate, ReplyError};
use crate::prompt::UserContent;

/// Longest upstream error body we echo back to the user.
const SNIPPET_LIMIT: usize = 200;

pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    async fn stream_chat(
        &self,
        system: &str,
        content: &UserContent,
    ) -> Result<DeltaStream, ReplyError> {
        // Credential check happens before any network traffic.
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ReplyError::MissingApiKey)?;

        let payload = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": content.to_json()},
            ],
            "stream": true,
        });

        let url = format!(
            "{}/api/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.config.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            request = request.header("X-Title", title);
        }

        let response = request.json(&payload).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::PAYMENT_REQUIRED => return Err(ReplyError::QuotaExhausted),
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ReplyError::UpstreamStatus {
                    status: status.as_u16(),
                    snippet: truncate(&body, SNIPPET_LIMIT),
                });
            }
        }

        Ok(delta_stream(response))
    }
}

/// Decode the SSE body into text deltas. Events are lines prefixed
/// `data: `, a literal `[DONE]` payload terminates the stream, and
/// lines that fail to parse as JSON are skipped.
fn delta_stream(response: reqwest::Response) -> DeltaStream {
    let stream = async_stream::stream! {
        let mut bytes = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut done = false;

        'read: while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(ReplyError::Stream(e.to_string()));
                    return;
                }
            };

            for line in lines.push(&chunk) {
                match decode_line(&line) {
                    SseEvent::Delta(delta) => yield Ok(delta),
                    SseEvent::Done => {
                        done = true;
                        break 'read;
                    }
                    SseEvent::Skip => {}
                }
            }
        }

        // A connection close without a trailing newline still carries
        // the last event.
        if !done {
            if let Some(line) = lines.remainder() {
                if let SseEvent::Delta(delta) = decode_line(&line) {
                    yield Ok(delta);
                }
            }
        }
    };
    Box::pin(stream)
}

/// Accumulates raw bytes and yields complete lines. Splitting happens
/// on the byte level so a multibyte character straddling two network
/// chunks is never decoded in halves.
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Append a chunk and return every line it completed, trimmed.
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).trim().to_string());
        }
        lines
    }

    /// Whatever is left when the connection closes without a final
    /// newline.
    fn remainder(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).trim().to_string())
        }
    }
}

enum SseEvent {
    Delta(String),
    Done,
    Skip,
}

fn decode_line(line: &str) -> SseEvent {
    let Some(data) = line.strip_prefix("data: ") else {
        return SseEvent::Skip;
    };
    if data == "[DONE]" {
        return SseEvent::Done;
    }
    match parse_delta(data) {
        Some(delta) => SseEvent::Delta(delta),
        None => SseEvent::Skip,
    }
}

/// Pull `choices[0].delta.content` out of one event payload. Empty
/// deltas and unparseable events produce nothing.
fn parse_delta(data: &str) -> Option<String> {
    let value: Value = serde_json::from_str(data).ok()?;
    let content = value
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()?;
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}
