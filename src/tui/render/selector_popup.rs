use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode;

use super::helpers::centered_rect_fixed;

/// Option list for the status/priority/label/milestone select modes
pub fn render_selector(frame: &mut Frame, app: &App, area: Rect) {
    let Some(sel) = &app.selector else {
        return;
    };
    let bg = app.theme.background;
    let widest = sel
        .field
        .options
        .iter()
        .map(|o| unicode::display_width(&o.name))
        .max()
        .unwrap_or(0)
        .max(unicode::display_width(&sel.field.name) + 4);
    let popup_w = (widest as u16 + 6).min(area.width.saturating_sub(2));
    let popup_h = (sel.field.options.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);

    let inner_w = popup_w.saturating_sub(2) as usize;
    let lines: Vec<Line> = sel
        .field
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let selected = i == sel.cursor;
            let marker = if selected { "\u{25B8} " } else { "  " };
            let style = if selected {
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(option_color(app, &sel.field.name, &option.name)).bg(bg)
            };
            Line::from(Span::styled(
                unicode::fit_to_width(&format!("{}{}", marker, option.name), inner_w),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", sel.field.name),
            Style::default().fg(app.theme.highlight).bg(bg).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn option_color(app: &App, field: &str, option: &str) -> ratatui::style::Color {
    match field {
        "Status" => app.theme.status_color(option),
        "Priority" => app.theme.priority_color(option),
        "Labels" => app.theme.label_color(option),
        _ => app.theme.text,
    }
}
