use serde_json::{json, Value};

/// One typed unit of a multi-part prompt sent upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ImageUrl(String),
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text(text.into())
    }

    pub fn image_url<S: Into<String>>(url: S) -> Self {
        ContentBlock::ImageUrl(url.into())
    }

    /// Get the text if this is a Text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(text),
            _ => None,
        }
    }

    /// An empty text block contributes nothing to the prompt. Image
    /// references always count as content.
    pub fn is_empty(&self) -> bool {
        match self {
            ContentBlock::Text(text) => text.is_empty(),
            ContentBlock::ImageUrl(_) => false,
        }
    }

    /// The OpenAI content-part JSON for this block.
    pub fn to_part(&self) -> Value {
        match self {
            ContentBlock::Text(text) => json!({"type": "text", "text": text}),
            ContentBlock::ImageUrl(url) => {
                json!({"type": "image_url", "image_url": {"url": url}})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_shapes() {
        assert_eq!(
            ContentBlock::text("hi").to_part(),
            json!({"type": "text", "text": "hi"})
        );
        assert_eq!(
            ContentBlock::image_url("https://img.example/x.png").to_part(),
            json!({"type": "image_url", "image_url": {"url": "https://img.example/x.png"}})
        );
    }

    #[test]
    fn test_emptiness() {
        assert!(ContentBlock::text("").is_empty());
        assert!(!ContentBlock::text("x").is_empty());
        assert!(!ContentBlock::image_url("u").is_empty());
    }
}
