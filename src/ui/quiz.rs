use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::engine::MAX_SELECTIONS;
use crate::models::{MAX_ANSWER, MIN_ANSWER};

const TIMER_WARNING_SECONDS: u32 = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], app);
    render_image(frame, chunks[1], app);
    render_slots(frame, chunks[2], app.selection());
    render_numbers(frame, chunks[3], app.selection());
    render_controls(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let label = Paragraph::new(app.label().to_string()).fg(Color::DarkGray);
    frame.render_widget(label, halves[0]);

    let mut spans = Vec::with_capacity(3);
    if let Some(seconds) = app.seconds_left() {
        let color = if seconds <= TIMER_WARNING_SECONDS {
            Color::Red
        } else {
            Color::Yellow
        };
        spans.push(Span::styled(
            format!("{:>3}s", seconds),
            Style::default().fg(color).bold(),
        ));
        spans.push(Span::raw("   "));
    }
    spans.push(Span::styled(
        format!("{} / {}", app.current_question_number(), app.total_questions()),
        Style::default().fg(Color::DarkGray),
    ));

    let progress = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
    frame.render_widget(progress, halves[1]);
}

fn render_image(frame: &mut Frame, area: Rect, app: &App) {
    let text = app
        .current_question()
        .map(|q| q.image.clone())
        .unwrap_or_default();

    let widget = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(text, Style::default().fg(Color::White).bold())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" picture ")
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_slots(frame: &mut Frame, area: Rect, selection: &[u8]) {
    let mut spans = Vec::with_capacity(MAX_SELECTIONS * 2);
    for slot in 0..MAX_SELECTIONS {
        let (text, style) = match selection.get(slot) {
            Some(value) => (
                format!("[ {} ]", value),
                Style::default().fg(Color::Cyan).bold(),
            ),
            None => ("[   ]".to_string(), Style::default().fg(Color::DarkGray)),
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
    }

    let widget = Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_numbers(frame: &mut Frame, area: Rect, selection: &[u8]) {
    let spans: Vec<Span> = (MIN_ANSWER..=MAX_ANSWER)
        .map(|value| {
            let style = if selection.contains(&value) {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(format!(" {} ", value), style)
        })
        .collect();

    let widget = Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "1-9 toggle  ·  c clear  ·  enter next  ·  ← previous  ·  x finish  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
