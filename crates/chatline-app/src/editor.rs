//! Single-line input editor.
//!
//! Owned by the render loop and touched by nothing else. Holds at most
//! [`MAX_LINE_CHARS`] characters with a cursor in `0..=len`.

use crate::{KeyInput, flags::DirtyFlags, line::MAX_LINE_CHARS};

/// Editable line with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEditor {
    chars: Vec<char>,
    cursor: usize,
}

impl InputEditor {
    /// Empty editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters, `0..=len`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of characters in the line.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Apply one key.
    ///
    /// Returns the submitted line when `Enter` is pressed on a non-empty
    /// line; the editor is then cleared. Every key that changes the text or
    /// moves the cursor requests a repaint. Keys the editor does not own,
    /// such as [`KeyInput::Interrupt`], are ignored.
    pub fn handle_key(&mut self, key: KeyInput, flags: &DirtyFlags) -> Option<String> {
        let mut submitted = None;
        let changed = match key {
            KeyInput::Char(c) => self.insert(c),
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => self.move_left(),
            KeyInput::Right => self.move_right(),
            KeyInput::Enter => {
                submitted = self.submit();
                submitted.is_some()
            },
            KeyInput::Interrupt => false,
        };

        if changed {
            flags.request_refresh();
        }
        submitted
    }

    fn insert(&mut self, c: char) -> bool {
        if c.is_control() || self.chars.len() >= MAX_LINE_CHARS {
            return false;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn submit(&mut self) -> Option<String> {
        if self.chars.is_empty() {
            return None;
        }
        let line = self.chars.drain(..).collect();
        self.cursor = 0;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(editor: &mut InputEditor, flags: &DirtyFlags, text: &str) {
        for c in text.chars() {
            editor.handle_key(KeyInput::Char(c), flags);
        }
    }

    #[test]
    fn insert_in_the_middle() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        type_str(&mut editor, &flags, "abc");
        editor.handle_key(KeyInput::Left, &flags);
        editor.handle_key(KeyInput::Left, &flags);
        editor.handle_key(KeyInput::Char('X'), &flags);

        assert_eq!(editor.text(), "aXbc");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        type_str(&mut editor, &flags, "hello");
        editor.handle_key(KeyInput::Backspace, &flags);
        assert_eq!(editor.text(), "hell");

        editor.handle_key(KeyInput::Left, &flags);
        editor.handle_key(KeyInput::Left, &flags);
        editor.handle_key(KeyInput::Delete, &flags);
        assert_eq!(editor.text(), "hel");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn edges_are_no_ops() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        editor.handle_key(KeyInput::Backspace, &flags);
        editor.handle_key(KeyInput::Delete, &flags);
        editor.handle_key(KeyInput::Left, &flags);
        editor.handle_key(KeyInput::Right, &flags);

        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
        assert!(!flags.take_refresh());
    }

    #[test]
    fn submit_clears_and_returns_line() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        type_str(&mut editor, &flags, "hi there");
        let line = editor.handle_key(KeyInput::Enter, &flags);

        assert_eq!(line.as_deref(), Some("hi there"));
        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn empty_submit_yields_nothing() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        assert_eq!(editor.handle_key(KeyInput::Enter, &flags), None);
        assert!(!flags.take_refresh());
    }

    #[test]
    fn control_characters_ignored() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        editor.handle_key(KeyInput::Char('\t'), &flags);
        editor.handle_key(KeyInput::Char('\u{7f}'), &flags);
        editor.handle_key(KeyInput::Interrupt, &flags);

        assert!(editor.is_empty());
        assert!(!flags.take_refresh());
    }

    #[test]
    fn full_line_rejects_more_input() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        for _ in 0..MAX_LINE_CHARS + 5 {
            editor.handle_key(KeyInput::Char('z'), &flags);
        }
        assert_eq!(editor.len(), MAX_LINE_CHARS);
        assert_eq!(editor.cursor(), MAX_LINE_CHARS);
    }

    #[test]
    fn edits_request_refresh() {
        let flags = DirtyFlags::new();
        let mut editor = InputEditor::new();

        editor.handle_key(KeyInput::Char('a'), &flags);
        assert!(flags.take_refresh());
        editor.handle_key(KeyInput::Left, &flags);
        assert!(flags.take_refresh());
    }
}
