//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples the editor and render loop from the terminal library so the
/// same code runs against a real terminal and a scripted simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character key. Only printable characters are inserted.
    Char(char),
    /// Enter/Return key (submit the line).
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Delete key (delete character at cursor).
    Delete,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Ctrl-C delivered as a key while the terminal is in raw mode.
    Interrupt,
}
