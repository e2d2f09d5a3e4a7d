use thiserror::Error;

/// Longest diagnostic we surface for an unexpected failure.
const DIAGNOSTIC_LIMIT: usize = 100;

/// Failures that end a reply before or during the upstream stream.
///
/// Nothing here propagates past the reply pipeline: every variant is
/// rendered into a single user-facing fragment via [`ReplyError::user_message`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("OpenRouter API key is not configured")]
    MissingApiKey,

    #[error("upstream quota exhausted (HTTP 402)")]
    QuotaExhausted,

    #[error("upstream error {status}: {snippet}")]
    UpstreamStatus { status: u16, snippet: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("stream error: {0}")]
    Stream(String),
}

impl ReplyError {
    /// The text fragment shown to the caller for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ReplyError::MissingApiKey => {
                "Error: the OpenRouter API key is missing. \
                 Set OPENROUTER_API_KEY and restart the bot."
                    .to_string()
            }
            ReplyError::QuotaExhausted => {
                "The OpenRouter account is out of credits, so no reply \
                 can be generated right now. Please top up and try again."
                    .to_string()
            }
            ReplyError::UpstreamStatus { status, snippet } => {
                format!("Upstream error {}: {}", status, snippet)
            }
            other => format!(
                "Something went wrong: {}",
                truncate(&other.to_string(), DIAGNOSTIC_LIMIT)
            ),
        }
    }
}

/// Truncate to at most `limit` characters, char-boundary safe.
pub fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // Multibyte characters count as one each
        assert_eq!(truncate("héllo", 2), "hé");
    }

    #[test]
    fn test_quota_message_is_distinct() {
        let quota = ReplyError::QuotaExhausted.user_message();
        assert!(quota.contains("credits"));

        let upstream = ReplyError::UpstreamStatus {
            status: 500,
            snippet: "internal".to_string(),
        }
        .user_message();
        assert!(upstream.contains("500"));
        assert!(upstream.contains("internal"));
        assert_ne!(quota, upstream);
    }

    #[test]
    fn test_stream_error_is_truncated() {
        let long = "x".repeat(500);
        let message = ReplyError::Stream(long).user_message();
        assert!(message.chars().count() <= DIAGNOSTIC_LIMIT + "Something went wrong: ".len());
    }
}
