/// Shortens `text` to at most `max` bytes plus a "..." suffix.
///
/// Truncation backs off to a char boundary. Used for human-readable snapshot
/// output.
pub fn preview(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
