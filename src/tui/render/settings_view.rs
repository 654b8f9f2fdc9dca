use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::settings_form::SettingsField;

const LABEL_WIDTH: usize = 20;

pub fn render_settings(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let form = &app.settings;

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Settings",
            Style::default().fg(app.theme.highlight).bg(bg).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, field) in SettingsField::ALL.iter().enumerate() {
        let focused = i == form.focused;
        let row_bg = if focused { app.theme.selection_bg } else { bg };
        let marker = if focused { " \u{25B8} " } else { "   " };
        let value = form.value_text(*field);
        let value = if field.is_toggle() {
            if value == "y" { "[x]".to_string() } else { "[ ]".to_string() }
        } else {
            value
        };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(app.theme.selection_border).bg(row_bg)),
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                Style::default().fg(app.theme.purple).bg(row_bg),
            ),
            Span::styled(value, Style::default().fg(app.theme.text_bright).bg(row_bg)),
        ];
        if focused && !field.is_toggle() {
            spans.push(Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(row_bg)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab/\u{2191}\u{2193} move  Space toggle  Enter save  Esc cancel",
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    lines.push(Line::from(Span::styled(
        format!(" Item limit is capped at {}", crate::model::MAX_ITEM_LIMIT),
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::View;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};
    use crate::tui::test_support::loaded_app;

    #[test]
    fn form_rows_show_current_values() {
        let mut app = loaded_app();
        app.config.default_owner = "acme".into();
        app.config.default_exclude_done = true;
        app.set_view(View::Settings);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_settings(frame, &app, area));
        assert!(out.contains("\u{25B8} Project ID"));
        assert!(out.contains("Owner               acme"));
        assert!(out.contains("Exclude Done        [x]"));
        assert!(out.contains("Item Limit          100"));
    }
}
