//! Character-budget truncation for context snippets.
//!
//! Budgets count `char`s, not bytes, so a cut never lands inside a UTF-8
//! sequence. The marker is appended only when something was cut.

/// Appended to any field that was cut
pub const TRUNCATION_MARKER: &str = "... [truncated]";

pub struct ContextTruncator {
    max_chars: usize,
}

impl ContextTruncator {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Returns the (possibly cut) text and whether it was cut
    pub fn truncate(&self, text: &str) -> (String, bool) {
        match text.char_indices().nth(self.max_chars) {
            None => (text.to_string(), false),
            Some((byte_offset, _)) => {
                let mut cut = String::with_capacity(byte_offset + TRUNCATION_MARKER.len());
                cut.push_str(&text[..byte_offset]);
                cut.push_str(TRUNCATION_MARKER);
                (cut, true)
            }
        }
    }
}
