//! Format-specific text extraction for downloaded attachment bytes.

use anyhow::{anyhow, Result};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

/// Decode as UTF-8, tolerating invalid bytes.
pub fn text(bytes: &[u8]) -> Result<String> {
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Extract the text of a PDF, pages separated by newlines.
pub fn pdf(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow!("invalid PDF: {}", e))
}

/// Extract paragraph text from a DOCX document, joined with newlines.
pub fn docx(bytes: &[u8]) -> Result<String> {
    let doc = read_docx(bytes).map_err(|e| anyhow!("invalid DOCX: {}", e))?;

    let mut paragraphs = Vec::new();
    for child in &doc.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for content in &paragraph.children {
                if let ParagraphChild::Run(run) = content {
                    for piece in &run.children {
                        if let RunChild::Text(t) = piece {
                            line.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(line);
        }
    }
    Ok(paragraphs.join("\n"))
}
