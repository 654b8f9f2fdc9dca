use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Item;
use crate::tui::app::App;

use super::helpers::{centered_rect_fixed, wrap_text};

/// Overlay with the focused item's fields and its long-form body
pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let bg = app.theme.background;
    let popup_w = (area.width * 4 / 5).max(20).min(area.width);
    let popup_h = (area.height * 4 / 5).max(6).min(area.height);
    let popup = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, popup);
    let inner_w = popup_w.saturating_sub(4) as usize;

    let item = app.items.iter().find(|item| item.id == detail.item_id);
    let mut lines: Vec<Line> = Vec::new();
    match item {
        Some(item) => lines.extend(field_lines(app, item)),
        None => lines.push(Line::from(Span::styled(
            "Item is no longer in the project",
            Style::default().fg(app.theme.yellow).bg(bg),
        ))),
    }
    lines.push(Line::from(""));

    let body_style = Style::default().fg(app.theme.text).bg(bg);
    match (&detail.body, detail.loading) {
        (_, true) => lines.push(Line::from(Span::styled(
            "Loading description\u{2026}",
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
        (Some(body), false) if !body.trim().is_empty() => {
            for line in wrap_text(body, inner_w) {
                lines.push(Line::from(Span::styled(line, body_style)));
            }
        }
        _ => lines.push(Line::from(Span::styled(
            "No description",
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
    }

    let title = item.map_or_else(|| detail.item_id.clone(), |i| i.title.clone());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(app.theme.text_bright).bg(bg).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((detail.scroll, 0))
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, popup);
}

fn field_lines<'a>(app: &App, item: &Item) -> Vec<Line<'a>> {
    let bg = app.theme.background;
    let key_style = Style::default().fg(app.theme.purple).bg(bg);
    let value_style = Style::default().fg(app.theme.text).bg(bg);
    let row = |key: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("{:<11}", key), key_style),
            Span::styled(value, style),
        ])
    };

    let mut lines = vec![row(
        "Status",
        item.status.clone(),
        Style::default().fg(app.theme.status_color(&item.status)).bg(bg),
    )];
    let reference = item.reference();
    if !reference.is_empty() {
        lines.push(row("Issue", reference, value_style));
    }
    if !item.assignees.is_empty() {
        lines.push(row("Assignees", item.assignees.join(", "), value_style));
    }
    if !item.labels.is_empty() {
        lines.push(row("Labels", item.labels.join(", "), value_style));
    }
    let priority = item.effective_priority();
    if !priority.is_empty() {
        lines.push(row(
            "Priority",
            priority.to_string(),
            Style::default().fg(app.theme.priority_color(priority)).bg(bg),
        ));
    }
    if !item.milestone.is_empty() {
        lines.push(row("Milestone", item.milestone.clone(), value_style));
    }
    if !item.iteration_name().is_empty() {
        lines.push(row("Iteration", item.iteration_name().to_string(), value_style));
    }
    if !item.parent_issue.is_empty() {
        lines.push(row("Parent", item.parent_issue.clone(), value_style));
    }
    if !item.sub_issue_progress.is_empty() {
        lines.push(row("Sub-issues", item.sub_issue_progress.clone(), value_style));
    }
    if !item.url.is_empty() {
        lines.push(row("URL", item.url.clone(), Style::default().fg(app.theme.blue).bg(bg)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::DetailState;
    use crate::tui::render::test_helpers::{TERM_H, TERM_W, render_to_string};
    use crate::tui::test_support::loaded_app;

    fn with_detail(body: Option<&str>, loading: bool) -> App {
        let mut app = loaded_app();
        app.detail = Some(DetailState {
            item_id: "PVTI_120".into(),
            body: body.map(str::to_string),
            loading,
            scroll: 0,
        });
        app
    }

    #[test]
    fn shows_fields_and_body() {
        let app = with_detail(Some("Steps to reproduce"), false);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_detail(frame, &app, area));
        assert!(out.contains("Authentication flow"));
        assert!(out.contains("acme/repo1#120"));
        assert!(out.contains("Steps to reproduce"));
    }

    #[test]
    fn loading_placeholder_until_body_arrives() {
        let app = with_detail(None, true);
        let out = render_to_string(TERM_W, TERM_H, |frame, area| render_detail(frame, &app, area));
        assert!(out.contains("Loading description"));
    }
}
