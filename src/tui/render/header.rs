use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::push_right_hint;
use crate::tui::app::{App, View};

/// Render the view tabs and, below them, the active filter/sort/group line
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // indicators
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);
    render_indicators(frame, app, chunks[1]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![
        Span::styled(" ", bg_style),
        Span::styled("\u{25A6}", Style::default().fg(app.theme.purple).bg(bg)),
        Span::styled(" ", bg_style),
    ];
    for (view, label) in [
        (View::Board, "1 Board"),
        (View::Table, "2 Table"),
        (View::Roadmap, "3 Roadmap"),
        (View::Settings, "4 Settings"),
    ] {
        spans.push(Span::styled(
            format!(" {} ", label),
            tab_style(app, app.state.view == view),
        ));
        spans.push(sep.clone());
    }

    let title = if app.project.name.is_empty() {
        app.project.id.clone()
    } else {
        app.project.name.clone()
    };
    spans.push(Span::styled(
        format!(" {} ", title),
        Style::default().fg(app.theme.text_bright).bg(bg).add_modifier(Modifier::BOLD),
    ));

    let right = if app.loading {
        "loading\u{2026} ".to_string()
    } else {
        format!("{}/{} items ", app.filtered().len(), app.items.len())
    };
    push_right_hint(
        &mut spans,
        &right,
        area.width as usize,
        Style::default().fg(app.theme.dim).bg(bg),
    );

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn tab_style(app: &App, active: bool) -> Style {
    if active {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}

fn render_indicators(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let label = Style::default().fg(app.theme.purple).bg(bg);
    let value = Style::default().fg(app.theme.text).bg(bg);

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    if !app.state.filter.raw.trim().is_empty() {
        spans.push(Span::styled("filter: ", label));
        spans.push(Span::styled(format!("{}  ", app.state.filter.raw.trim()), value));
    }
    if app.state.view == View::Table {
        if let Some(sort) = app.state.sort.describe() {
            spans.push(Span::styled("sort: ", label));
            spans.push(Span::styled(format!("{}  ", sort), value));
        }
        if let Some(group) = app.state.group_by {
            spans.push(Span::styled("group: ", label));
            spans.push(Span::styled(format!("{}  ", group.as_str()), value));
        }
    }
    if spans.len() == 1 {
        // Plain separator when nothing is active
        spans.push(Span::styled(
            "\u{2500}".repeat((area.width as usize).saturating_sub(2)),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)), area);
}
