//! Detection and decoding of JSON documents embedded in strings

use serde_json::Value;

/// Whether trimmed `text` is bracketed like a JSON object or array.
pub(crate) fn is_json_like(text: &str) -> bool {
    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}

/// Decode `text` when it looks like a JSON object or array and parses as one.
pub(crate) fn decode(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !is_json_like(trimmed) {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}
