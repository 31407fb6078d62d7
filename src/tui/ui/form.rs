//! Add/edit form overlay, including the exercise editor section.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use super::scroll_offset;
use crate::tui::state::{FormModal, Slot};

const CHOICE_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, modal: &FormModal) {
    let focused = modal.focused();
    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0;

    let labels = modal.form.fields().labels();
    for (i, label) in labels.iter().enumerate() {
        let active = focused == Some(Slot::Field(i));
        if active {
            focus_line = lines.len();
        }
        let value = if modal.is_category_field(i) {
            modal
                .category_name()
                .map(|name| format!("◀ {} ▶", name))
                .unwrap_or_else(|| "◀ select ▶".to_string())
        } else {
            modal.inputs.get(i).cloned().unwrap_or_default()
        };
        lines.push(input_line(label, value, active));
    }

    if let Some(editor) = modal.form.exercises() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Exercises ({})", editor.len()),
            Style::default().fg(Color::Cyan).bold(),
        )));
        if editor.is_empty() {
            lines.push(Line::from(Span::styled(
                "No exercises. Press ^N to add one.",
                Style::default().fg(Color::DarkGray),
            )));
        }

        for (q, question) in editor.questions().iter().enumerate() {
            lines.push(Line::from(""));
            let active = focused == Some(Slot::Question(q));
            if active {
                focus_line = lines.len();
            }
            let label = format!("Exercise {}", q + 1);
            lines.push(input_line(&label, question.text.clone(), active));

            for (c, choice) in question.choices.iter().enumerate() {
                let active = focused == Some(Slot::Choice(q, c));
                if active {
                    focus_line = lines.len();
                }
                let marker = if choice.is_correct { "(*)" } else { "( )" };
                let marker_style = if choice.is_correct {
                    Style::default().fg(Color::Green).bold()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let text_style = if active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::styled(marker, marker_style),
                    Span::styled(format!(" {}) ", CHOICE_LABELS[c]), text_style),
                    Span::styled(choice.text.clone(), text_style),
                    Span::styled(if active { "_" } else { "" }, text_style),
                ]));
            }
        }
    }

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(2)]).split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", modal.form.title()))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .padding(Padding::horizontal(1));

    let inner_height = chunks[0].height.saturating_sub(2);
    let widget = Paragraph::new(lines)
        .scroll((scroll_offset(focus_line, inner_height), 0))
        .block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(widget, chunks[0]);

    let footer = match modal.form.error() {
        Some(err) => Paragraph::new(err).fg(Color::Red),
        None => Paragraph::new("Enter save  ·  Esc cancel").fg(Color::DarkGray),
    };
    frame.render_widget(
        footer.block(Block::default().padding(Padding::horizontal(1))),
        chunks[1],
    );
}

fn input_line(label: &str, value: String, active: bool) -> Line<'static> {
    let style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::styled(
            format!("{:<16}", format!("{}:", label)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(value, style),
        Span::styled(if active { "_" } else { "" }, style),
    ])
}
