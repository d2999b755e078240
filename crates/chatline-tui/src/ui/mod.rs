//! UI rendering
//!
//! Rendering functions that turn a [`View`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O): the rows they draw were
//! already wrapped and trimmed by the render loop.

mod input;
mod panes;

use chatline_app::View;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View) {
    let layout = view.layout;
    let [logs_area, messages_area, input_area, _] = Layout::vertical([
        Constraint::Length(layout.log_height),
        Constraint::Length(layout.message_height),
        Constraint::Length(layout.input_height),
        Constraint::Min(0),
    ])
    .areas(frame.area());

    panes::render_logs(frame, view, logs_area);
    panes::render_messages(frame, view, messages_area);
    input::render(frame, view, input_area);
}
