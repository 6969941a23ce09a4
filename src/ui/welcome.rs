use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let timing = match app.time_limit() {
        Some(seconds) => format!("{} s per question", seconds),
        None => "untimed".to_string(),
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "PICTURE QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(app.label(), Style::default().fg(Color::White))),
        Line::from(Span::styled(
            format!("{} Questions · {}", app.total_questions(), timing),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from("pick up to 4 answers per question".fg(Color::DarkGray)),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
