use crossterm::event::{KeyCode, KeyEvent};

use super::*;

pub(super) fn handle_detail(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.detail = None;
            app.state.mode = Mode::Normal;
        }
        KeyCode::Char('j') | KeyCode::Down => scroll(app, 1),
        KeyCode::Char('k') | KeyCode::Up => scroll(app, -1),
        KeyCode::PageDown => scroll(app, 10),
        KeyCode::PageUp => scroll(app, -10),
        _ => {}
    }
}

fn scroll(app: &mut App, delta: i32) {
    if let Some(detail) = &mut app.detail {
        detail.scroll = (i32::from(detail.scroll) + delta).clamp(0, i32::from(u16::MAX)) as u16;
    }
}
