//! Driver trait for abstracting terminal I/O.
//!
//! The [`Driver`] trait decouples the render loop from a concrete terminal.
//! The production frontend implements it with a real terminal, the harness
//! with a scripted in-memory one, while the generic [`crate::Runtime`] owns
//! all orchestration.

use crate::{KeyInput, layout::PaneLayout};

/// Everything needed to paint one frame.
///
/// Rows are pre-wrapped to the pane width and already trimmed to the pane
/// height, so drawing needs no access to shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Pane geometry the rows were wrapped for.
    pub layout: PaneLayout,
    /// Visible log rows, oldest first.
    pub log_rows: Vec<String>,
    /// Visible message rows, oldest first.
    pub message_rows: Vec<String>,
    /// Display name for the message pane title.
    pub identity_name: String,
    /// Current conversation for the message pane title.
    pub conversation_id: Option<String>,
    /// Input line text.
    pub input: String,
    /// Cursor position within `input`, in characters.
    pub cursor: usize,
}

/// Terminal surface used by the render loop.
///
/// Only the render loop calls into a driver. Every method returns promptly;
/// none blocks waiting for input.
pub trait Driver {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Next queued key, or `None` when nothing is pending.
    fn poll_key(&mut self) -> Result<Option<KeyInput>, Self::Error>;

    /// Current surface size as (columns, rows).
    fn size(&self) -> Result<(u16, u16), Self::Error>;

    /// Tear the surface down and rebuild it at the current size.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Paint one frame.
    fn draw(&mut self, view: &View) -> Result<(), Self::Error>;
}
