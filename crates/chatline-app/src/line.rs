//! Bounded text lines.
//!
//! Every line held by a [`crate::SharedLineBuffer`] or typed into the
//! [`crate::InputEditor`] is capped at [`LINE_CAP`] code units. Text past the
//! cap is dropped silently; overflow never produces an error.

use std::borrow::Cow;

/// Hard cap on a line, counted in code units including the terminator slot.
///
/// Stored text therefore holds at most `LINE_CAP - 1` characters.
pub const LINE_CAP: usize = 2048;

/// Longest text a line may store.
pub const MAX_LINE_CHARS: usize = LINE_CAP - 1;

/// Truncate `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Number of terminal rows a text of `len` characters occupies when wrapped
/// at `width` columns. Empty text still takes one row.
pub fn rows_for(len: usize, width: usize) -> usize {
    let width = width.max(1);
    if len == 0 { 1 } else { len.div_ceil(width) }
}

/// Split `text` into rows of at most `width` characters.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|row| row.iter().collect()).collect()
}

/// An immutable line of display text with an optional tag.
///
/// The prefix is kept apart from the text and only joined when the line is
/// formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    prefix: Option<String>,
}

impl Line {
    /// Create a line, truncating both parts to the line cap.
    pub fn new(text: &str, prefix: Option<&str>) -> Self {
        Self {
            text: truncate_chars(text, MAX_LINE_CHARS).to_owned(),
            prefix: prefix.map(|p| truncate_chars(p, MAX_LINE_CHARS).to_owned()),
        }
    }

    /// Line body without the prefix.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display form, `[prefix] text`, capped at the line limit.
    pub fn formatted(&self) -> Cow<'_, str> {
        match &self.prefix {
            None => Cow::Borrowed(&self.text),
            Some(prefix) => {
                let full = format!("[{prefix}] {}", self.text);
                Cow::Owned(truncate_chars(&full, MAX_LINE_CHARS).to_owned())
            },
        }
    }

    /// Rows occupied by the formatted line at `width` columns.
    pub fn rows(&self, width: usize) -> usize {
        rows_for(self.formatted().chars().count(), width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_past_cap_is_truncated() {
        let long = "x".repeat(LINE_CAP + 10);
        let line = Line::new(&long, None);
        assert_eq!(line.text().len(), MAX_LINE_CHARS);
    }

    #[test]
    fn prefix_joined_at_format_time() {
        let line = Line::new("hello", Some("12:00:00"));
        assert_eq!(line.text(), "hello");
        assert_eq!(line.formatted(), "[12:00:00] hello");
    }

    #[test]
    fn formatted_line_respects_cap() {
        let long = "y".repeat(MAX_LINE_CHARS);
        let line = Line::new(&long, Some("tag"));
        assert_eq!(line.formatted().chars().count(), MAX_LINE_CHARS);
    }

    #[test]
    fn row_counts() {
        assert_eq!(rows_for(0, 10), 1);
        assert_eq!(rows_for(10, 10), 1);
        assert_eq!(rows_for(11, 10), 2);
        assert_eq!(rows_for(25, 10), 3);
        // Zero width is treated as one column
        assert_eq!(rows_for(3, 0), 3);
    }

    #[test]
    fn wrap_splits_on_width() {
        assert_eq!(wrap("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap("", 3), vec![""]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 5), "hi");
    }
}
