use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::helpers::{push_right_hint, spans_width};
use crate::tui::app::{App, Mode, View};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let mode = app.state.mode;

    let mut spans: Vec<Span> = Vec::new();
    if mode.is_text_input() {
        // Prompt: label + buffer, terminal cursor placed in the buffer
        let prompt = match mode {
            Mode::Filtering => "/".to_string(),
            _ => format!("{}: ", mode.label().to_lowercase()),
        };
        spans.push(Span::styled(prompt.clone(), Style::default().fg(app.theme.highlight).bg(bg)));
        spans.push(Span::styled(
            app.input.text().to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        let cursor_x = area.x as usize + crate::util::unicode::display_width(&prompt) + app.input.cursor_column();
        if cursor_x < (area.x + area.width) as usize {
            frame.set_cursor_position(Position::new(cursor_x as u16, area.y));
        }
        let hint = match mode {
            Mode::Filtering => "Enter apply  Esc cancel",
            Mode::Assigning | Mode::LabelsInput => "comma separated  Enter save  Esc cancel",
            _ => "Enter save  Esc cancel",
        };
        push_right_hint(&mut spans, hint, width, dim);
    } else {
        // Mode badge, then the newest active notification
        if mode != Mode::Normal {
            spans.push(Span::styled(
                format!(" {} ", mode.label()),
                Style::default()
                    .fg(app.theme.background)
                    .bg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(" ", dim));
        }
        if let Some(n) = app.notifications.active().last() {
            spans.push(Span::styled(
                n.message.clone(),
                Style::default().fg(app.theme.level_color(n.level)).bg(bg),
            ));
        }
        let hint = mode_hint(app);
        if spans_width(&spans) + hint.len() < width {
            push_right_hint(&mut spans, hint, width, dim);
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn mode_hint(app: &App) -> &'static str {
    match app.state.mode {
        Mode::Normal if app.state.view == View::Table => "/ filter  s sort  m group  i edit  o detail  q quit",
        Mode::Normal if app.state.view == View::Roadmap => "/ filter  h l iteration  w status  o detail  q quit",
        Mode::Normal => "/ filter  w status  a assign  i edit  o detail  q quit",
        Mode::Sort => "t S r L m s p a n c u  Esc cancel",
        Mode::FieldToggle => "m r l s p  toggle field",
        Mode::Detail => "j/k scroll  Esc close",
        Mode::StatusSelect | Mode::LabelSelect | Mode::MilestoneSelect | Mode::PrioritySelect => {
            "j/k choose  Enter apply  Esc cancel"
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{TERM_W, render_to_string};
    use crate::tui::test_support::{key, loaded_app, type_text};

    #[test]
    fn filter_prompt_shows_buffer() {
        let mut app = loaded_app();
        handle_key(&mut app, key('/'));
        type_text(&mut app, "label:bug");
        let out = render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with("/label:bug"));
        assert!(out.ends_with("Enter apply  Esc cancel"));
    }

    #[test]
    fn latest_active_notification_is_shown() {
        let mut app = loaded_app();
        app.notify(Level::Info, "first");
        app.notify(Level::Error, "Error: boom");
        let out = render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(out.starts_with("Error: boom"));
    }

    #[test]
    fn dismissed_notifications_are_hidden() {
        let mut app = loaded_app();
        let id = app.notifications.push(Level::Info, "gone").id;
        app.notifications.dismiss(id);
        let out = render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, &app, area));
        assert!(!out.contains("gone"));
    }
}
