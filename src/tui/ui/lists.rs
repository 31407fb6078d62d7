//! Catalog list screens.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use super::scroll_offset;
use crate::tui::state::{AdminApp, Screen, VocabularyView};

pub fn render(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let (title, rows, selected): (String, Vec<Vec<String>>, usize) = match &app.screen {
        Screen::Categories(list) => (
            "Categories".to_string(),
            list.items.iter().map(|c| vec![c.name.clone()]).collect(),
            list.selected,
        ),
        Screen::Vocabulary(view) => {
            let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).split(area);
            render_filters(frame, chunks[0], view);
            let rows = view
                .visible()
                .iter()
                .map(|v| {
                    vec![
                        v.arabic_text.clone(),
                        v.indonesian_text.clone(),
                        v.category_name().to_string(),
                    ]
                })
                .collect();
            render_rows(frame, chunks[1], "Vocabulary", rows, view.selected);
            return;
        }
        Screen::Levels(list) => (
            "Levels".to_string(),
            list.items
                .iter()
                .map(|l| {
                    vec![
                        format!("#{}", l.sequence),
                        l.name.clone(),
                        l.description.clone(),
                    ]
                })
                .collect(),
            list.selected,
        ),
        Screen::Lessons { level, list } => (
            format!("Lessons of {}", level.name),
            list.items
                .iter()
                .map(|l| vec![format!("#{}", l.sequence), l.title.clone()])
                .collect(),
            list.selected,
        ),
        _ => return,
    };
    render_rows(frame, area, &title, rows, selected);
}

fn render_filters(frame: &mut Frame, area: Rect, view: &VocabularyView) {
    let search_style = if view.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
        Span::styled(view.search.as_str(), search_style),
        Span::styled(if view.searching { "_" } else { "" }, search_style),
        Span::styled("    Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(view.category_label(), Style::default().fg(Color::Cyan)),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_rows(frame: &mut Frame, area: Rect, title: &str, rows: Vec<Vec<String>>, selected: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ({}) ", title, rows.len()))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .padding(Padding::horizontal(1));

    if rows.is_empty() {
        let widget = Paragraph::new("Nothing here yet. Press [a] to add one.")
            .fg(Color::DarkGray)
            .block(block);
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .map(|(i, cells)| {
            let is_selected = i == selected;
            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let mut spans = vec![Span::styled(if is_selected { "> " } else { "  " }, style)];
            for (c, cell) in cells.into_iter().enumerate() {
                if c > 0 {
                    spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
                }
                spans.push(Span::styled(cell, style));
            }
            Line::from(spans)
        })
        .collect();

    let inner_height = area.height.saturating_sub(2);
    let widget = Paragraph::new(lines)
        .scroll((scroll_offset(selected, inner_height), 0))
        .block(block);
    frame.render_widget(widget, area);
}
