use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::ReplyError;
use crate::prompt::UserContent;

/// The incremental text deltas of one streaming completion. Unbounded
/// until the upstream signals completion or the connection closes.
pub type DeltaStream = BoxStream<'static, Result<String, ReplyError>>;

/// Base trait for streaming chat providers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Open a streaming chat completion and return its delta sequence.
    ///
    /// An `Err` here aborts the request before any delta is produced
    /// (missing credential, upstream rejection). Errors yielded inside
    /// the stream end it after whatever was already received.
    async fn stream_chat(
        &self,
        system: &str,
        content: &UserContent,
    ) -> Result<DeltaStream, ReplyError>;
}
