//! The re-chunking buffer. Upstream deltas often arrive as single
//! characters; emitting each one as its own downstream event is wasteful
//! and jittery, so the buffer coalesces them into readable bursts.

/// Deltas that force a flush on their own, regardless of buffer length.
const BREAK_DELTAS: [&str; 4] = [".", "!", "?", "\n"];

/// Default flush threshold, in characters.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 50;

/// Accumulates upstream text deltas and flushes them downstream in
/// larger fragments.
///
/// A flush happens after an append when either the accumulated
/// character count exceeds the threshold, or the just-appended delta is
/// exactly a sentence boundary (`.`, `!`, `?`) or a newline. The
/// concatenation of all flushed fragments always equals the
/// concatenation of all appended deltas, in order.
#[derive(Debug)]
pub struct ChunkBuffer {
    pending: String,
    threshold: usize,
}

impl ChunkBuffer {
    pub fn new(threshold: usize) -> Self {
        ChunkBuffer {
            pending: String::new(),
            threshold,
        }
    }

    /// Append one delta, returning the fragment to emit if this append
    /// triggered a flush. Never returns an empty fragment.
    pub fn push(&mut self, delta: &str) -> Option<String> {
        self.pending.push_str(delta);
        if self.pending.chars().count() > self.threshold || BREAK_DELTAS.contains(&delta) {
            self.take()
        } else {
            None
        }
    }

    /// Terminal flush: whatever is still pending when the stream ends.
    pub fn finish(mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }
}

impl Default for ChunkBuffer {
    fn default() -> Self {
        ChunkBuffer::new(DEFAULT_FLUSH_THRESHOLD)
    }
}
