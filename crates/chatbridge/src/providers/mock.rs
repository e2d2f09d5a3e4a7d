use async_trait::async_trait;
use futures::stream;
use std::sync::Mutex;

use super::base::{DeltaStream, Provider};
use crate::errors::ReplyError;
use crate::prompt::UserContent;

type Script = Result<Vec<Result<String, ReplyError>>, ReplyError>;

/// A provider that replays a scripted outcome, for pipeline tests.
pub struct MockProvider {
    script: Mutex<Option<Script>>,
}

impl MockProvider {
    /// Stream the given deltas, then end normally.
    pub fn with_deltas(deltas: &[&str]) -> Self {
        let items = deltas.iter().map(|d| Ok(d.to_string())).collect();
        Self {
            script: Mutex::new(Some(Ok(items))),
        }
    }

    /// Replay deltas and mid-stream errors exactly as given.
    pub fn with_items(items: Vec<Result<String, ReplyError>>) -> Self {
        Self {
            script: Mutex::new(Some(Ok(items))),
        }
    }

    /// Fail the request before any delta is produced.
    pub fn with_error(error: ReplyError) -> Self {
        Self {
            script: Mutex::new(Some(Err(error))),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn stream_chat(
        &self,
        _system: &str,
        _content: &UserContent,
    ) -> Result<DeltaStream, ReplyError> {
        let script = self
            .script
            .lock()
            .unwrap()
            .take()
            .expect("mock provider already consumed");
        match script {
            Ok(items) => Ok(Box::pin(stream::iter(items))),
            Err(e) => Err(e),
        }
    }
}
