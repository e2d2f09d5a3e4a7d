//! The reply pipeline: attachments → prompt → upstream stream →
//! re-chunking buffer. One inbound message in, one ordered sequence of
//! text fragments out.

use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;

use crate::attachments::{self, Normalized};
use crate::buffer::{ChunkBuffer, DEFAULT_FLUSH_THRESHOLD};
use crate::models::message::IncomingMessage;
use crate::prompt::{self, PromptMode};
use crate::providers::base::Provider;

/// Fixed system instruction sent with every upstream request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Keep your answers short and friendly.";

/// Fragment shown when a turn carries no usable content at all.
const NO_CONTENT_NOTICE: &str =
    "There is nothing to respond to: the message has no text and no readable attachment.";

/// Runs inbound messages through the full pipeline for one bot.
///
/// The handler is cheap to construct and holds no per-request state;
/// every call to [`ReplyHandler::reply`] works on request-local data
/// only.
pub struct ReplyHandler<P> {
    provider: P,
    client: Client,
    mode: PromptMode,
    flush_threshold: usize,
}

impl<P: Provider> ReplyHandler<P> {
    pub fn new(provider: P) -> Self {
        ReplyHandler {
            provider,
            client: Client::new(),
            mode: PromptMode::Structured,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }

    pub fn with_mode(mut self, mode: PromptMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    /// Produce the ordered fragment stream for one message.
    ///
    /// The stream is infallible: every failure is rendered as a single
    /// user-facing fragment and ends the stream. Dropping the stream
    /// mid-way drops the upstream connection with it.
    pub fn reply(&self, message: IncomingMessage) -> BoxStream<'_, String> {
        let stream = async_stream::stream! {
            let mut blocks = Vec::new();
            for attachment in &message.attachments {
                match attachments::normalize(&self.client, attachment).await {
                    Normalized::Block(block) => blocks.push(block),
                    Normalized::Notice(notice) => yield notice,
                }
            }

            let Some(content) = prompt::assemble(&message.content, blocks, self.mode) else {
                yield NO_CONTENT_NOTICE.to_string();
                return;
            };

            let mut deltas = match self.provider.stream_chat(SYSTEM_PROMPT, &content).await {
                Ok(deltas) => deltas,
                Err(e) => {
                    yield e.user_message();
                    return;
                }
            };

            let mut buffer = ChunkBuffer::new(self.flush_threshold);
            let mut failure = None;
            while let Some(delta) = deltas.next().await {
                match delta {
                    Ok(delta) => {
                        if let Some(fragment) = buffer.push(&delta) {
                            yield fragment;
                        }
                    }
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                }
            }

            // Terminal flush first so no received delta is ever dropped,
            // then the diagnostic if the stream broke.
            if let Some(fragment) = buffer.finish() {
                yield fragment;
            }
            if let Some(e) = failure {
                yield e.user_message();
            }
        };
        Box::pin(stream)
    }
}
