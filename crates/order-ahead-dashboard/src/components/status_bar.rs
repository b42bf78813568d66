// crates/order-ahead-dashboard/src/components/status_bar.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (msg, style) = match &app.snapshot.status {
        Some(error) => (
            Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red))),
            Style::default().fg(Color::Red),
        ),
        None => {
            let shortcuts = vec![
                Span::styled("[P]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::raw("rocess "),
                Span::styled("[C]", Style::default().fg(Color::Cyan)),
                Span::raw("lear "),
                Span::styled("[R]", Style::default().fg(Color::Yellow)),
                Span::raw("efresh "),
                Span::styled("[Enter]", Style::default().fg(Color::Magenta)),
                Span::raw("Details "),
                Span::styled("[Q]", Style::default().fg(Color::Gray)),
                Span::raw("uit"),
            ];
            (Line::from(shortcuts), Style::default())
        }
    };

    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(style);

    let paragraph = Paragraph::new(msg)
        .block(status_block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
