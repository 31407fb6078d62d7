//! Screen rendering.

mod dashboard;
mod form;
mod lists;
mod login;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::state::{AdminApp, Modal, Screen};

/// Render the current screen, then any form or prompt on top of it.
pub fn render(frame: &mut Frame, app: &AdminApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(5),    // Screen
        Constraint::Length(1), // Status
    ])
    .split(area);

    render_header(frame, chunks[0], app);

    match &app.screen {
        Screen::Login { .. } => login::render(frame, chunks[1], app),
        Screen::Dashboard { .. } => dashboard::render(frame, chunks[1], app),
        Screen::Categories(_)
        | Screen::Vocabulary(_)
        | Screen::Levels(_)
        | Screen::Lessons { .. } => lists::render(frame, chunks[1], app),
    }

    render_status(frame, chunks[2], app);

    if let Some(modal) = &app.form {
        form::render(frame, centered_rect(80, 85, area), modal);
    }
    if let Some(Modal::ConfirmDelete { label, .. }) = &app.modal {
        render_confirm(frame, centered_rect(50, 25, area), label);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let mut spans = vec![Span::styled(
        " CATALOG ADMIN ",
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    )];
    if let Some(user) = &app.user {
        spans.push(Span::styled(
            format!("  {}", user.display_name()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let line = if let Some(label) = app.busy {
        Span::styled(label, Style::default().fg(Color::Yellow))
    } else if let Some(message) = &app.status {
        Span::styled(message.as_str(), Style::default().fg(Color::Red))
    } else {
        Span::styled(hints(app), Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn hints(app: &AdminApp) -> &'static str {
    if app.modal.is_some() {
        return "[Y] delete  ·  [N] keep";
    }
    if app.form.is_some() {
        return "Tab/↓ next  ·  ⇧Tab/↑ prev  ·  ^N add question  ·  ^D remove  ·  ^T mark correct  ·  Enter save  ·  Esc cancel";
    }
    match &app.screen {
        Screen::Login { .. } => "Tab switch field  ·  Enter sign in  ·  Esc quit",
        Screen::Dashboard { .. } => "j/k select  ·  Enter open  ·  r refresh  ·  q quit",
        Screen::Vocabulary(view) if view.searching => "Type to search  ·  Enter/Esc done",
        Screen::Vocabulary(_) => {
            "a add  ·  e edit  ·  d delete  ·  / search  ·  c category  ·  r refresh  ·  Esc back"
        }
        Screen::Levels(_) => "a add  ·  e edit  ·  Enter lessons  ·  d delete  ·  r refresh  ·  Esc back",
        Screen::Categories(_) | Screen::Lessons { .. } => {
            "a add  ·  e edit  ·  d delete  ·  r refresh  ·  Esc back"
        }
    }
}

fn render_confirm(frame: &mut Frame, area: Rect, label: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete {}?", label),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Y] delete  ·  [N] keep",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm ")
                .title_style(Style::default().fg(Color::Red).bold()),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(widget, area);
}

/// A rectangle of the given percentages, centred in `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

/// First line to show so that `selected` stays inside a window of `height` lines.
pub(crate) fn scroll_offset(selected: usize, height: u16) -> u16 {
    let height = usize::from(height.max(1));
    selected.saturating_sub(height - 1).min(u16::MAX as usize) as u16
}
