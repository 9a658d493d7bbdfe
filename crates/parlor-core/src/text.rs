//! UTF-8–safe truncation for log previews.
//!
//! Slicing a `&str` at an arbitrary byte index panics inside a multi-byte
//! character, so log fields that preview visitor text must snap to the
//! nearest char boundary first.

/// Truncate a string to at most `max_bytes` bytes at a char boundary.
#[inline]
#[must_use]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Short preview of visitor text for log fields: truncated to `max_bytes`
/// with an ellipsis when anything was cut.
#[must_use]
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    format!("{}…", truncate_str(s, max_bytes))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
