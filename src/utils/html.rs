//! Utility functions for handling Telegram HTML formatting
//!
//! All bot output is sent with `ParseMode::Html`, so any user-provided text
//! has to be escaped before it is interpolated into a message.

/// Escapes HTML special characters for Telegram's HTML parse mode
///
/// Only `&`, `<`, `>` and `"` carry meaning in Telegram HTML. Markdown
/// characters such as `*` or `_` are left untouched because they have no
/// effect in this mode.
///
/// # Example
/// ```
/// use nudge_bot::utils::html::escape_html;
///
/// let text = "<b>hi</b> & bye";
/// assert_eq!(escape_html(text), "&lt;b&gt;hi&lt;/b&gt; &amp; bye");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Uppercases the first letter and lowercases the rest, for display names.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
