use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use regex::Regex;

use crate::model::CardFields;
use crate::ops::projection::{Card, Column};
use crate::tui::app::App;
use crate::util::unicode;

use super::push_highlighted_spans;

/// Lines per card: title, metadata, spacer
const CARD_HEIGHT: usize = 3;

/// Render the kanban board: one column per status
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let columns = app.board_columns();
    if columns.is_empty() {
        let msg = if app.loading {
            " Loading\u{2026}"
        } else if app.state.filter.is_empty() {
            " No items"
        } else {
            " No matching items"
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let search_re = app.search_regex();
    for (ci, (column, col_area)) in columns.iter().zip(areas.iter()).enumerate() {
        let focused_row = (ci == app.state.board.column).then_some(app.state.board.row);
        render_column(frame, app, column, *col_area, focused_row, search_re.as_ref());
    }
}

fn render_column(
    frame: &mut Frame,
    app: &App,
    column: &Column,
    area: Rect,
    focused_row: Option<usize>,
    search_re: Option<&Regex>,
) {
    let bg = app.theme.background;
    let header_color = app.theme.status_color(&column.name);
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .title(Span::styled(
            format!(" {} ({}) ", column.name, column.cards.len()),
            Style::default().fg(header_color).bg(bg).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let visible_cards = (inner.height as usize / CARD_HEIGHT).max(1);
    let focus = focused_row.unwrap_or(0);
    let scroll = if focused_row.is_some() && focus >= visible_cards {
        focus + 1 - visible_cards
    } else {
        0
    };

    let mut lines: Vec<Line> = Vec::new();
    for (row, card) in column.cards.iter().enumerate().skip(scroll).take(visible_cards) {
        let selected = focused_row == Some(row);
        lines.extend(card_lines(app, card, width, selected, search_re));
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
}

fn card_lines<'a>(
    app: &App,
    card: &Card,
    width: usize,
    selected: bool,
    search_re: Option<&Regex>,
) -> Vec<Line<'a>> {
    let theme = &app.theme;
    let bg = if selected { theme.selection_bg } else { theme.background };
    let marker = if selected {
        Span::styled("\u{258E}", Style::default().fg(theme.selection_border).bg(bg))
    } else {
        Span::styled(" ", Style::default().bg(bg))
    };

    // Title, highlighted where it matches the free-text filter
    let title = unicode::truncate_to_width(&card.title, width.saturating_sub(2));
    let title_style = if selected {
        Style::default().fg(theme.text_bright).bg(bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).bg(bg)
    };
    let hl_style = Style::default().fg(theme.search_match_fg).bg(theme.search_match_bg);
    let mut title_spans = vec![marker.clone()];
    push_highlighted_spans(&mut title_spans, &title, title_style, hl_style, search_re);
    pad_line(&mut title_spans, width, Style::default().bg(bg));

    let mut meta_spans = vec![marker];
    meta_spans.extend(meta_spans_for(app, card, &app.state.card_fields, bg));
    truncate_spans(&mut meta_spans, width);
    pad_line(&mut meta_spans, width, Style::default().bg(bg));

    vec![
        Line::from(title_spans),
        Line::from(meta_spans),
        Line::from(Span::styled("", Style::default().bg(theme.background))),
    ]
}

/// Metadata line: reference, assignee, priority and the enabled optional fields
fn meta_spans_for<'a>(app: &App, card: &Card, fields: &CardFields, bg: ratatui::style::Color) -> Vec<Span<'a>> {
    let theme = &app.theme;
    let dim = Style::default().fg(theme.dim).bg(bg);
    let mut spans: Vec<Span> = Vec::new();
    let sep = |spans: &mut Vec<Span<'a>>| {
        if !spans.is_empty() {
            spans.push(Span::styled(" ", dim));
        }
    };

    if card.number > 0 {
        spans.push(Span::styled(format!("#{}", card.number), dim));
    }
    if !card.assignee.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(format!("@{}", card.assignee), Style::default().fg(theme.cyan).bg(bg)));
    }
    if !card.priority.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(
            card.priority.clone(),
            Style::default().fg(theme.priority_color(&card.priority)).bg(bg),
        ));
    }
    if fields.labels {
        for label in &card.labels {
            sep(&mut spans);
            spans.push(Span::styled(
                format!("#{}", label),
                Style::default().fg(theme.label_color(label)).bg(bg),
            ));
        }
    }
    if fields.milestone && !card.milestone.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(format!("\u{25C6}{}", card.milestone), Style::default().fg(theme.yellow).bg(bg)));
    }
    if fields.repository && !card.repository.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(card.repository.clone(), dim));
    }
    if fields.sub_issues && !card.sub_issue_progress.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(format!("[{}]", card.sub_issue_progress), dim));
    }
    if fields.parent_issue && !card.parent_issue.is_empty() {
        sep(&mut spans);
        spans.push(Span::styled(format!("\u{2191}{}", card.parent_issue), dim));
    }
    spans
}

fn pad_line(spans: &mut Vec<Span>, width: usize, style: Style) {
    let used = super::helpers::spans_width(spans);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
}

/// Drop or cut trailing spans so the line fits in `width` columns
fn truncate_spans(spans: &mut Vec<Span>, width: usize) {
    let mut used = 0;
    let mut keep = spans.len();
    for (i, span) in spans.iter_mut().enumerate() {
        let w = unicode::display_width(&span.content);
        if used + w > width {
            let cut = unicode::truncate_to_width(&span.content, width - used);
            span.content = cut.into();
            keep = i + 1;
            break;
        }
        used += w;
    }
    spans.truncate(keep);
}
