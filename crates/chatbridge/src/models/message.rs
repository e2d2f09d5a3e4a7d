use serde::{Deserialize, Serialize};

/// Extensions treated as plain text when the MIME type is not conclusive.
const TEXT_EXTENSIONS: &[&str] = &["py", "js", "html", "css", "json", "md", "txt"];

/// One inbound turn from the hosting bot platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl IncomingMessage {
    /// Create a text-only message.
    pub fn text<S: Into<String>>(content: S) -> Self {
        IncomingMessage {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    /// Add an attachment to the message.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A platform attachment reference. The bytes live behind `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content_type: String,
    pub url: String,
}

impl Attachment {
    pub fn new<S: Into<String>, T: Into<String>, U: Into<String>>(
        name: S,
        content_type: T,
        url: U,
    ) -> Self {
        Attachment {
            name: name.into(),
            content_type: content_type.into(),
            url: url.into(),
        }
    }

    /// The handling category for this attachment.
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::classify(&self.content_type, &self.name)
    }
}

/// How an attachment is turned into prompt content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Passed upstream as an image URL, never downloaded here.
    Image,
    /// Downloaded and decoded as UTF-8 text.
    Text,
    /// Downloaded and run through PDF text extraction.
    Pdf,
    /// Downloaded and run through DOCX paragraph extraction.
    Docx,
    /// No extractor; produces a "not supported" notice.
    Other,
}

impl AttachmentKind {
    /// Classify from the declared MIME type, falling back to the file
    /// extension allow-list for text.
    pub fn classify(content_type: &str, name: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if mime.starts_with("image/") {
            return AttachmentKind::Image;
        }
        if mime.starts_with("text/") {
            return AttachmentKind::Text;
        }
        match mime.as_str() {
            "application/pdf" => AttachmentKind::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                AttachmentKind::Docx
            }
            "application/json" | "application/javascript" => AttachmentKind::Text,
            _ => match name.rsplit_once('.') {
                Some((_, ext)) => {
                    let ext = ext.to_ascii_lowercase();
                    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
                        AttachmentKind::Text
                    } else {
                        AttachmentKind::Other
                    }
                }
                None => AttachmentKind::Other,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_mime() {
        assert_eq!(
            AttachmentKind::classify("image/png", "photo.png"),
            AttachmentKind::Image
        );
        assert_eq!(
            AttachmentKind::classify("text/plain; charset=utf-8", "notes"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::classify("application/pdf", "paper.pdf"),
            AttachmentKind::Pdf
        );
        assert_eq!(
            AttachmentKind::classify(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                "report.docx"
            ),
            AttachmentKind::Docx
        );
        assert_eq!(
            AttachmentKind::classify("application/json", "data"),
            AttachmentKind::Text
        );
    }

    #[test]
    fn test_classify_by_extension_fallback() {
        assert_eq!(
            AttachmentKind::classify("application/octet-stream", "script.py"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::classify("", "README.md"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::classify("application/octet-stream", "archive.zip"),
            AttachmentKind::Other
        );
        assert_eq!(
            AttachmentKind::classify("application/octet-stream", "README"),
            AttachmentKind::Other
        );
    }

    #[test]
    fn test_message_builder() {
        let message = IncomingMessage::text("hello").with_attachment(Attachment::new(
            "a.txt",
            "text/plain",
            "https://files.example/a.txt",
        ));
        assert_eq!(message.content, "hello");
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].kind(), AttachmentKind::Text);
    }

    #[test]
    fn test_message_deserializes_with_defaults() {
        let message: IncomingMessage = serde_json::from_str(r#"{"content": "hi"}"#).unwrap();
        assert_eq!(message.content, "hi");
        assert!(message.attachments.is_empty());
    }
}
