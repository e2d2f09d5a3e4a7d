//! Prompt assembly: merge the user's text and the normalized attachment
//! content into the `"content"` value of the outbound user message.

use serde_json::{json, Value};

use crate::models::content::ContentBlock;

/// How attachment content is folded into the upstream prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Ordered multi-part content: text parts and image references,
    /// user text first, then attachments in attachment order.
    Structured,
    /// One flat string. Image blocks are dropped.
    Flattened,
}

/// The `"content"` of the outbound user message.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    Parts(Vec<ContentBlock>),
}

impl UserContent {
    /// The JSON value placed at `messages[1].content`.
    pub fn to_json(&self) -> Value {
        match self {
            UserContent::Text(text) => json!(text),
            UserContent::Parts(parts) => {
                Value::Array(parts.iter().map(ContentBlock::to_part).collect())
            }
        }
    }
}

/// Combine user text and content blocks. Returns `None` when nothing
/// usable remains, in which case the upstream call is skipped entirely.
pub fn assemble(user_text: &str, blocks: Vec<ContentBlock>, mode: PromptMode) -> Option<UserContent> {
    match mode {
        PromptMode::Structured => {
            let mut parts = Vec::new();
            if !user_text.is_empty() {
                parts.push(ContentBlock::text(user_text));
            }
            parts.extend(blocks.into_iter().filter(|block| !block.is_empty()));
            if parts.is_empty() {
                None
            } else {
                Some(UserContent::Parts(parts))
            }
        }
        PromptMode::Flattened => {
            let mut sections = Vec::new();
            if !user_text.is_empty() {
                sections.push(user_text.to_string());
            }
            for block in blocks {
                if let ContentBlock::Text(text) = block {
                    if !text.is_empty() {
                        sections.push(text);
                    }
                }
            }
            if sections.is_empty() {
                None
            } else {
                Some(UserContent::Text(sections.join("\n\n")))
            }
        }
    }
}
