//! Text helpers for list and card rendering.

/// Suffix appended to truncated text.
const ELLIPSIS: &str = "...";

/// Truncates `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
    }
}
