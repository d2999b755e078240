//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Key reads never block: the
//! render loop drains whatever is queued and goes back to sleep.

use std::{
    io::{self, Stdout, stdout},
    sync::Arc,
    time::Duration,
};

use chatline_app::{DirtyFlags, Driver, KeyInput, View};
use crossterm::{
    ExecutableCommand,
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use thiserror::Error;

use crate::ui;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns raw mode and the alternate screen for its whole lifetime; dropping
/// it restores the terminal.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    flags: Arc<DirtyFlags>,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    ///
    /// Resize events read from the terminal are forwarded to `flags`.
    pub fn new(flags: Arc<DirtyFlags>) -> Result<Self, TerminalError> {
        enable_raw_mode()?;

        let terminal = stdout()
            .execute(EnterAlternateScreen)
            .and_then(|_| Terminal::new(CrosstermBackend::new(stdout())));

        match terminal {
            Ok(terminal) => Ok(Self { terminal, flags }),
            Err(e) => {
                restore();
                Err(e.into())
            },
        }
    }

    /// Convert a crossterm key event to `KeyInput`.
    ///
    /// Ctrl-C arrives as a key in raw mode and becomes the interrupt.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(KeyInput::Interrupt),
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    fn poll_key(&mut self) -> Result<Option<KeyInput>, Self::Error> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(input) = Self::convert_key(key) {
                        return Ok(Some(input));
                    }
                },
                Event::Resize(..) => self.flags.request_resize(),
                _ => {},
            }
        }
        Ok(None)
    }

    fn size(&self) -> Result<(u16, u16), Self::Error> {
        Ok(crossterm::terminal::size()?)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        let (cols, rows) = self.size()?;
        self.terminal.resize(Rect::new(0, 0, cols, rows))?;
        self.terminal.clear()?;
        Ok(())
    }

    fn draw(&mut self, view: &View) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, view))?;
        Ok(())
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        restore();
    }
}

fn restore() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = stdout().execute(Show);
}
