use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Config;
use crate::remote::StubClient;

use super::app::{App, Session};
use super::input::handle_key;

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        handle_key(app, key(c));
    }
}

/// App holding the sample project, focused on its first card
pub fn loaded_app() -> App {
    let session = Session {
        project_id: "1".into(),
        item_limit: 100,
        ..Default::default()
    };
    let mut app = App::new(session, Config::default());
    app.project = StubClient::sample_project();
    app.items = StubClient::sample_items();
    app.sync_focus();
    app
}
