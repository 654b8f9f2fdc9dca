use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Item;
use crate::ops::projection::{self, TableRow};
use crate::tui::app::{App, TableColumn};
use crate::util::unicode;

use super::push_highlighted_spans;

/// Fixed width of every column except the title, which takes the rest
fn column_width(column: TableColumn) -> usize {
    match column {
        TableColumn::Title => 0,
        TableColumn::Status => 12,
        TableColumn::Repository => 16,
        TableColumn::Labels => 16,
        TableColumn::Milestone => 10,
        TableColumn::SubIssues => 10,
        TableColumn::ParentIssue => 12,
        TableColumn::Priority => 8,
        TableColumn::Assignees => 14,
    }
}

/// Text shown in one cell
pub fn cell_text(item: &Item, column: TableColumn) -> String {
    match column {
        TableColumn::Title => item.title.clone(),
        TableColumn::Status => item.status.clone(),
        TableColumn::Repository => item.reference(),
        TableColumn::Labels => item.labels.join(", "),
        TableColumn::Milestone => item.milestone.clone(),
        TableColumn::SubIssues => item.sub_issue_progress.clone(),
        TableColumn::ParentIssue => item.parent_issue.clone(),
        TableColumn::Priority => item.effective_priority().to_string(),
        TableColumn::Assignees => item.assignees.join(", "),
    }
}

/// Render the table, flat or grouped
pub fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let items = app.table_items();
    if items.is_empty() {
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

    let buckets = app.grouped_buckets(&items);
    let rows: Vec<TableRow> = match &buckets {
        Some(buckets) => projection::flatten(buckets),
        None => items.iter().copied().map(TableRow::Item).collect(),
    };

    let columns = app.visible_columns();
    let widths = layout_widths(&columns, area.width as usize);

    let mut lines: Vec<Line> = vec![header_line(app, &columns, &widths)];
    let visible = (area.height as usize).saturating_sub(1).max(1);
    let cursor = app.state.table_row;
    let scroll = if cursor >= visible { cursor + 1 - visible } else { 0 };

    let search_re = app.search_regex();
    for (i, row) in rows.iter().enumerate().skip(scroll).take(visible) {
        match row {
            TableRow::Header { name, count } => {
                let text = format!(" \u{25BE} {} ({})", name, count);
                lines.push(Line::from(Span::styled(
                    unicode::fit_to_width(&text, area.width as usize),
                    Style::default().fg(app.theme.purple).bg(bg).add_modifier(Modifier::BOLD),
                )));
            }
            TableRow::Item(item) => {
                let selected = i == cursor;
                let row_bg = if selected { app.theme.selection_bg } else { bg };
                let mut spans: Vec<Span> = Vec::new();
                for (ci, (column, width)) in columns.iter().zip(&widths).enumerate() {
                    let text = unicode::fit_to_width(&cell_text(item, *column), *width);
                    let mut style = Style::default().fg(cell_color(app, item, *column)).bg(row_bg);
                    if selected && ci == app.state.table_column {
                        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    let lead = if ci == 0 && selected { "\u{258E}" } else { " " };
                    spans.push(Span::styled(
                        lead,
                        Style::default().fg(app.theme.selection_border).bg(row_bg),
                    ));
                    if *column == TableColumn::Title {
                        let hl = Style::default().fg(app.theme.search_match_fg).bg(app.theme.search_match_bg);
                        push_highlighted_spans(&mut spans, &text, style, hl, search_re.as_ref());
                    } else {
                        spans.push(Span::styled(text, style));
                    }
                }
                lines.push(Line::from(spans));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// Column widths for the available space; one leading gap per column
fn layout_widths(columns: &[TableColumn], total: usize) -> Vec<usize> {
    let fixed: usize = columns.iter().map(|c| column_width(*c) + 1).sum();
    let title = total.saturating_sub(fixed + 1).max(10);
    columns
        .iter()
        .map(|c| match c {
            TableColumn::Title => title,
            other => column_width(*other),
        })
        .collect()
}

fn header_line<'a>(app: &App, columns: &[TableColumn], widths: &[usize]) -> Line<'a> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = Vec::new();
    for (ci, (column, width)) in columns.iter().zip(widths).enumerate() {
        let mut style = Style::default().fg(app.theme.dim).bg(bg).add_modifier(Modifier::BOLD);
        if ci == app.state.table_column {
            style = style.fg(app.theme.highlight);
        }
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled(unicode::fit_to_width(column.label(), *width), style));
    }
    Line::from(spans)
}

fn cell_color(app: &App, item: &Item, column: TableColumn) -> ratatui::style::Color {
    let theme = &app.theme;
    match column {
        TableColumn::Status => theme.status_color(&item.status),
        TableColumn::Priority => theme.priority_color(item.effective_priority()),
        TableColumn::Labels => item
            .labels
            .first()
            .map_or(theme.text, |l| theme.label_color(l)),
        TableColumn::Assignees => theme.cyan,
        TableColumn::Title => theme.text_bright,
        _ => theme.text,
    }
}
