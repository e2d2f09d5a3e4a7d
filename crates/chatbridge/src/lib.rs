//! chatbridge connects a hosting bot platform to the OpenRouter
//! chat-completions API. One inbound message per turn is flattened into
//! a streaming upstream request, and the model's text comes back to the
//! caller as an ordered sequence of coalesced fragments.

pub mod attachments;
pub mod buffer;
pub mod errors;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod reply;
