//! Attachment normalization: platform attachment references become
//! prompt content blocks or user-visible notices.
//!
//! A single unreadable attachment never aborts the turn; it comes back
//! as a [`Normalized::Notice`] and the rest of the message still goes
//! upstream.

use anyhow::Result;
use reqwest::Client;

use crate::models::content::ContentBlock;
use crate::models::message::{Attachment, AttachmentKind};

pub mod extract;

/// Outcome of normalizing one attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Content to include in the upstream prompt.
    Block(ContentBlock),
    /// A user-visible notice; the attachment contributes no content.
    Notice(String),
}

/// Extractor for a downloadable attachment kind.
type Extractor = fn(&[u8]) -> Result<String>;

/// Capability table: downloadable kinds and their text extractors.
fn extractor_for(kind: AttachmentKind) -> Option<Extractor> {
    match kind {
        AttachmentKind::Text => Some(extract::text),
        AttachmentKind::Pdf => Some(extract::pdf),
        AttachmentKind::Docx => Some(extract::docx),
        AttachmentKind::Image | AttachmentKind::Other => None,
    }
}

/// Normalize one attachment into prompt content or a notice.
pub async fn normalize(client: &Client, attachment: &Attachment) -> Normalized {
    let kind = attachment.kind();

    // The upstream model fetches images itself; pass the URL through.
    if kind == AttachmentKind::Image {
        return Normalized::Block(ContentBlock::image_url(&attachment.url));
    }

    let Some(extractor) = extractor_for(kind) else {
        return Normalized::Notice(format!("File format not supported: {}", attachment.name));
    };

    match fetch_and_extract(client, &attachment.url, extractor).await {
        Ok(text) => Normalized::Block(ContentBlock::text(format!(
            "FILE: {}\n{}\nEND FILE",
            attachment.name, text
        ))),
        Err(e) => Normalized::Notice(format!("Could not read file {}: {}", attachment.name, e)),
    }
}

async fn fetch_and_extract(client: &Client, url: &str, extractor: Extractor) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    extractor(&bytes)
}
