//! Pane geometry.
//!
//! Three stacked panes: logs, messages, input. Heights include the one-row
//! border on each side. Recomputed only when the surface is rebuilt.

use crate::context::ClientConfig;

/// Rows taken by the input pane, borders included.
pub const INPUT_HEIGHT: u16 = 3;

/// Rows and columns a border takes from a pane.
pub const BORDER: u16 = 2;

/// Heights of the three panes for one terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    /// Terminal width shared by every pane.
    pub width: u16,
    /// Log pane height.
    pub log_height: u16,
    /// Message pane height.
    pub message_height: u16,
    /// Input pane height.
    pub input_height: u16,
}

impl PaneLayout {
    /// Fit the preferred pane sizes into `cols` x `rows`.
    ///
    /// When the preferred sizes do not fit above the input pane, the log pane
    /// gets a third of the remaining rows and the message pane the rest.
    pub fn compute(cols: u16, rows: u16, config: &ClientConfig) -> Self {
        let available = rows.saturating_sub(INPUT_HEIGHT);
        let mut log_height = config.log_pane_rows.saturating_add(BORDER);
        let mut message_height = config.message_pane_rows.saturating_add(BORDER);

        if log_height.saturating_add(message_height) > available {
            log_height = available / 3;
            message_height = available - log_height;
        }

        Self { width: cols, log_height, message_height, input_height: INPUT_HEIGHT.min(rows) }
    }

    /// Text area of the log pane as (columns, rows).
    pub fn log_inner(&self) -> (usize, usize) {
        self.inner(self.log_height)
    }

    /// Text area of the message pane as (columns, rows).
    pub fn message_inner(&self) -> (usize, usize) {
        self.inner(self.message_height)
    }

    fn inner(&self, height: u16) -> (usize, usize) {
        (usize::from(self.width.saturating_sub(BORDER)), usize::from(height.saturating_sub(BORDER)))
    }
}
