use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{ResultRecord, ResultsSummary};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.results() else {
        return;
    };
    let percentage = summary.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app.label(), summary, grade_color);

    let body = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_question_breakdown(frame, body[0], summary, app.result_cursor());
    if let Some(record) = app.selected_result() {
        render_detail(frame, body[1], app.result_cursor(), record);
    }
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    summary: &ResultsSummary,
    grade_color: Color,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                summary.score(),
                summary.total(),
                summary.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, summary: &ResultsSummary, cursor: usize) {
    let lines: Vec<Line> = summary
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let (symbol, color) = if record.is_correct() {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            let marker = if index == cursor { ">" } else { " " };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Cyan)),
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(join_answers(record.correct_answers()), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    // Keep the cursor in view.
    let visible = area.height.saturating_sub(1) as usize;
    let scroll = cursor.saturating_sub(visible.saturating_sub(1));

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_detail(frame: &mut Frame, area: Rect, index: usize, record: &ResultRecord) {
    let mut your_answer = vec![Span::styled(
        "your answer:   ",
        Style::default().fg(Color::White).bold(),
    )];
    if record.user_answers().is_empty() {
        your_answer.push(Span::styled("none", Style::default().fg(Color::Red)));
    }
    for (value, in_correct_set) in record.marked_answers() {
        let style = if in_correct_set {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::Red).crossed_out()
        };
        your_answer.push(Span::styled(format!("{}", value), style));
        your_answer.push(Span::raw(" "));
    }

    let content = vec![
        Line::from(Span::styled(
            record.image().to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(your_answer),
        Line::from(vec![
            Span::styled("correct answer: ", Style::default().fg(Color::White).bold()),
            Span::styled(
                join_answers(record.correct_answers()),
                Style::default().fg(Color::Green),
            ),
        ]),
    ];

    let widget = Paragraph::new(content).block(
        Block::default()
            .title(format!(" question {} ", index + 1))
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn join_answers(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k browse  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
