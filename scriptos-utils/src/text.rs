/// Marker appended to text that was cut short.
pub const TRUNCATION_MARKER: &str = "...";

const FENCE_OVERHEAD_CHARS: usize = "```\n\n```".len();

/// Keep at most `max_chars` characters of `text`, appending [`TRUNCATION_MARKER`] if cut.
///
/// Counts `char`s, so multi-byte input is never split inside a code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Follow every backtick with a zero-width space so no run of them can form a fence.
pub fn escape_backticks(text: &str) -> String {
    text.replace('`', "`\u{200B}")
}

/// Wrap text in a fenced code block of at most `max_chars` characters.
///
/// User input is escaped first, so it can never close the block early.
pub fn code_block(text: &str, max_chars: usize) -> String {
    let budget = max_chars.saturating_sub(FENCE_OVERHEAD_CHARS + TRUNCATION_MARKER.len());
    format!("```\n{}\n```", preview(&escape_backticks(text), budget))
}
