//! Log and message panes
//!
//! Both panes draw pre-wrapped rows inside a titled border.

use chatline_app::View;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// Render the diagnostic log pane, dimmed.
pub fn render_logs(frame: &mut Frame, view: &View, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Logs ")
        .border_style(Style::default().fg(Color::DarkGray));

    let rows: Vec<Line> = view.log_rows.iter().map(|row| Line::raw(row.as_str())).collect();
    let paragraph = Paragraph::new(rows)
        .style(Style::default().add_modifier(Modifier::DIM))
        .block(block);

    frame.render_widget(paragraph, area);
}

/// Render the chat pane, titled with the identity and current conversation.
pub fn render_messages(frame: &mut Frame, view: &View, area: Rect) {
    let conversation = view.conversation_id.as_deref().unwrap_or("no conversation");
    let title = format!(" Messages [{}] [{conversation}] ", view.identity_name);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Line> = view.message_rows.iter().map(|row| Line::raw(row.as_str())).collect();
    frame.render_widget(Paragraph::new(rows).block(block), area);
}
