//! Dashboard: catalog totals and navigation.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::models::DashboardStats;
use crate::tui::state::{AdminApp, Screen, DASHBOARD_MENU};

pub fn render(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let Screen::Dashboard { stats, selected } = &app.screen else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(3), // Welcome
        Constraint::Length(5), // Totals
        Constraint::Min(6),    // Menu
    ])
    .margin(1)
    .split(area);

    let name = app.user.as_ref().map(|u| u.display_name()).unwrap_or("admin");
    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(
            "Dashboard",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(Span::styled(
            format!("Welcome back, {}", name),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(welcome, chunks[0]);

    render_totals(frame, chunks[1], stats.as_ref());
    render_menu(frame, chunks[2], *selected);
}

fn render_totals(frame: &mut Frame, area: Rect, stats: Option<&DashboardStats>) {
    let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    let values = stats.map(|s| {
        [
            s.total_categories,
            s.total_vocabulary,
            s.total_lessons,
            s.total_levels,
        ]
    });
    let titles = ["Categories", "Vocabulary", "Lessons", "Levels"];

    for (i, title) in titles.iter().enumerate() {
        let value = values
            .map(|v| v[i].to_string())
            .unwrap_or_else(|| "-".to_string());
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(Color::Yellow).bold(),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", title))
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::vertical(1)),
        );
        frame.render_widget(widget, cards[i]);
    }
}

fn render_menu(frame: &mut Frame, area: Rect, selected: usize) {
    let lines: Vec<Line> = DASHBOARD_MENU
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == selected;
            let style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(if is_selected { "> " } else { "  " }, style),
                Span::styled(*entry, style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Manage ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
