pub mod board_view;
pub mod detail_panel;
pub mod header;
pub(crate) mod helpers;
pub mod roadmap_view;
pub mod selector_popup;
pub mod settings_view;
pub mod status_row;
pub mod table_view;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, View};

/// Draw the whole screen: header, active view, status row, overlays
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tabs + indicators
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match app.state.view {
        View::Board => board_view::render_board(frame, app, chunks[1]),
        View::Table => table_view::render_table(frame, app, chunks[1]),
        View::Roadmap => roadmap_view::render_roadmap(frame, app, chunks[1]),
        View::Settings => settings_view::render_settings(frame, app, chunks[1]),
    }

    // Overlays (rendered on top of the content)
    if app.selector.is_some() {
        selector_popup::render_selector(frame, app, chunks[1]);
    }
    if app.detail.is_some() {
        detail_panel::render_detail(frame, app, chunks[1]);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let Some(re) = search_re else {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    };

    let mut last_end = 0;
    for range in crate::ops::search::find_matches(re, text) {
        if range.start > last_end {
            spans.push(Span::styled(text[last_end..range.start].to_string(), base_style));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), highlight_style));
        last_end = range.end;
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlighted_spans_split_on_matches() {
        let re = Regex::new("(?i)log").unwrap();
        let mut spans = Vec::new();
        let base = Style::default();
        let hl = Style::default().bg(ratatui::style::Color::Red);
        push_highlighted_spans(&mut spans, "Login and logout", base, hl, Some(&re));
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["Log", "in and ", "log", "out"]);
        assert_eq!(spans[0].style, hl);
    }

    #[test]
    fn no_regex_pushes_single_span() {
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "plain", Style::default(), Style::default(), None);
        assert_eq!(spans.len(), 1);
    }
}
