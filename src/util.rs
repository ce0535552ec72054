/// Marker appended to a string that was cut short by [`truncate_string`]
pub const ELLIPSIS: &str = "...";

/// Truncates a string to at most `max_chars` characters, appending [`ELLIPSIS`] if it was truncated.
///
/// Counting is done on `char`s so a multi-byte codepoint is never split.
/// The ellipsis is not counted towards `max_chars`.
///
/// # Arguments
/// * `string` - The string to truncate
/// * `max_chars` - The maximum amount of characters kept from the string
#[must_use]
pub fn truncate_string(string: &impl ToString, max_chars: usize) -> String {
    let string = string.to_string();
    match string.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &string[..cut]),
        None => string,
    }
}
