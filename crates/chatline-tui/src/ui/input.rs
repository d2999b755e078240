//! Input line
//!
//! Displays the input buffer with cursor, scrolled horizontally so the
//! cursor always stays visible.

use chatline_app::View;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const PROMPT: &str = "> ";
const PROMPT_WIDTH: u16 = 2;
const BORDER_WIDTH: u16 = 1;
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const CURSOR_SLACK: u16 = 1; // cell for the cursor past the last character

/// Render the input line.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let prompt_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let block =
        Block::default().borders(Borders::ALL).title(" Input ").title_style(prompt_style);

    let available = area.width.saturating_sub(2 * BORDER_WIDTH + PROMPT_WIDTH + CURSOR_SLACK);
    let start = scroll_start(view.cursor, usize::from(available));
    let visible: String = view.input.chars().skip(start).take(usize::from(available)).collect();

    let line = Line::from(vec![Span::styled(PROMPT, prompt_style), Span::raw(visible)]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    if area.height > INPUT_LINE_OFFSET_Y {
        let offset = u16::try_from(view.cursor - start).unwrap_or(available);
        let cursor_x = area.x.saturating_add(BORDER_WIDTH + PROMPT_WIDTH).saturating_add(offset);
        let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// First visible character so the cursor fits in `available` columns.
fn scroll_start(cursor: usize, available: usize) -> usize {
    if available == 0 {
        return cursor;
    }
    if cursor >= available { cursor - available + 1 } else { 0 }
}
