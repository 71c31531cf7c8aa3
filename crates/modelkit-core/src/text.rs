//! Length-bounded text.

/// Appended to text that was cut by [`limit_chars`].
pub const TRUNCATION_MARKER: &str = "...";

/// Keep at most `max` characters of `text`, appending `marker` when
/// anything was cut. Counts Unicode scalar values, not bytes.
pub fn limit_chars(text: &str, max: usize, marker: &str) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + marker.len());
            out.push_str(&text[..cut]);
            out.push_str(marker);
            out
        }
    }
}
