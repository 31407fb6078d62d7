use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::state::{AdminApp, LoginFocus, Screen};

pub fn render(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let Screen::Login {
        email,
        password,
        focus,
        error,
    } = &app.screen
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Length(12),
        Constraint::Percentage(30),
    ])
    .split(area);

    let field = |label: &'static str, value: String, active: bool| {
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if active { "_" } else { " " };
        Line::from(vec![
            Span::styled(format!("{:>10}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, style),
            Span::styled(cursor, style),
        ])
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "ADMIN SIGN IN",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        field("Email", email.clone(), *focus == LoginFocus::Email),
        Line::from(""),
        field(
            "Password",
            "*".repeat(password.chars().count()),
            *focus == LoginFocus::Password,
        ),
        Line::from(""),
    ];

    match error {
        Some(err) => content.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}
