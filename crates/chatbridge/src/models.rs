//! These models represent the objects passed around for a single turn.
//!
//! Everything here is ephemeral and request-local: an inbound message
//! and its attachments exist only while that turn is being processed,
//! and the content blocks they produce are consumed by the prompt
//! assembler before the upstream call.

pub mod content;
pub mod message;
