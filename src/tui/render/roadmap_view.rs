use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::projection::{Timeline, status_progress};
use crate::tui::app::App;
use crate::util::unicode;

use super::push_highlighted_spans;

const BAR_SEGMENTS: usize = 10;
const STATUS_WIDTH: usize = 12;

/// Ten-cell bar for a 0-100 percentage
fn progress_bar(percent: u8) -> String {
    let filled = ((percent.min(100) as usize * BAR_SEGMENTS + 50) / 100).min(BAR_SEGMENTS);
    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(BAR_SEGMENTS - filled))
}

/// `2024-05-06 → 2024-05-19`, or whichever end is known
fn date_range(timeline: &Timeline) -> String {
    match (timeline.start, timeline.end) {
        (Some(start), Some(end)) => format!("{} \u{2192} {}", start, end),
        (Some(start), None) => format!("starts {}", start),
        _ => String::new(),
    }
}

/// Render items grouped under their iterations, earliest first
pub fn render_roadmap(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let timelines = app.roadmap();
    if timelines.is_empty() {
        let msg = if app.state.filter.is_empty() {
            " No items"
        } else {
            " No matching items"
        };
        frame.render_widget(
            Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg)),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let title_width = width.saturating_sub(STATUS_WIDTH + BAR_SEGMENTS + 10).max(10);
    let search_re = app.search_regex();

    let mut lines: Vec<Line> = Vec::new();
    // Line index of the focused item, for scrolling
    let mut cursor_line = 0;
    for timeline in &timelines {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        let percent = timeline.progress();
        let header = vec![
            Span::styled(
                format!(" {}", timeline.name),
                Style::default().fg(app.theme.blue).bg(bg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", date_range(timeline)),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
            Span::styled(
                format!("  {} {:>3}%", progress_bar(percent), percent),
                Style::default().fg(app.theme.green).bg(bg),
            ),
        ];
        lines.push(Line::from(header));

        for item in &timeline.items {
            let selected = app.state.focused_id.as_deref() == Some(item.id.as_str());
            if selected {
                cursor_line = lines.len();
            }
            let row_bg = if selected { app.theme.selection_bg } else { bg };
            let lead = if selected { "\u{258E}" } else { " " };
            let mut spans = vec![
                Span::styled(lead, Style::default().fg(app.theme.selection_border).bg(row_bg)),
                Span::styled(" ", Style::default().bg(row_bg)),
            ];
            let title = unicode::fit_to_width(&item.title, title_width);
            let style = Style::default().fg(app.theme.text_bright).bg(row_bg);
            let hl = Style::default().fg(app.theme.search_match_fg).bg(app.theme.search_match_bg);
            push_highlighted_spans(&mut spans, &title, style, hl, search_re.as_ref());
            spans.push(Span::styled(
                format!(" {}", unicode::fit_to_width(&item.status, STATUS_WIDTH)),
                Style::default().fg(app.theme.status_color(&item.status)).bg(row_bg),
            ));
            spans.push(Span::styled(
                format!(" {}", progress_bar(status_progress(&item.status))),
                Style::default().fg(app.theme.dim).bg(row_bg),
            ));
            lines.push(Line::from(spans));
        }
    }

    let visible = (area.height as usize).max(1);
    let scroll = if cursor_line >= visible { cursor_line + 1 - visible } else { 0 };
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .style(Style::default().bg(bg)),
        area,
    );
}
