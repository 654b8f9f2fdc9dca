use crate::model::{Config, Level, is_done_status};
use crate::ops::focus::BoardPos;
use crate::ops::reconcile;
use crate::parse::with_iterations;

use super::app::{App, Mode, View};
use super::input;
use super::message::{Msg, Task};

/// Apply one message to the application state. Returns the tasks the
/// transition requested; nothing here blocks.
pub fn update(app: &mut App, msg: Msg) -> Vec<Task> {
    match msg {
        Msg::Key(key) => input::handle_key(app, key),
        Msg::Resize => {}
        Msg::ProjectLoaded { project, mut items } => {
            if app.session.exclude_done {
                items.retain(|item| !is_done_status(&item.status));
            }
            let count = items.len();
            app.project = project;
            app.items = items;
            app.loading = false;
            app.state.focused_id = None;
            app.state.board = BoardPos::default();
            app.state.table_row = 0;
            app.sync_focus();
            app.notify(Level::Info, format!("Loaded {} items", count));
        }
        Msg::ItemUpdated { index, item } => {
            match reconcile::reconcile(&mut app.items, index, item) {
                Ok(_) => {
                    app.sync_focus();
                    app.notify(Level::Info, "Item updated successfully");
                }
                Err(e) => {
                    tracing::warn!(index, len = app.items.len(), "dropping stale update");
                    app.notify(Level::Warning, format!("Update ignored: {}", e));
                }
            }
        }
        Msg::DetailReady { item_id, body } => {
            if let Some(detail) = &mut app.detail
                && detail.item_id == item_id
            {
                detail.body = Some(body);
                detail.loading = false;
            }
        }
        Msg::ActionDone(message) => app.notify(Level::Info, message),
        Msg::CardFieldsSaved => app.notify(Level::Info, "Card fields preference saved"),
        Msg::SettingsSaved(config) => apply_settings(app, config),
        Msg::Error(message) => {
            app.loading = false;
            if let Some(detail) = &mut app.detail {
                detail.loading = false;
            }
            app.notify_error(message);
        }
        Msg::DismissNotification(id) => {
            app.notifications.dismiss(id);
        }
    }
    app.take_tasks()
}

/// Adopt a freshly saved config. A different project triggers a reload.
fn apply_settings(app: &mut App, config: Config) {
    let project_changed = config.default_project_id != app.session.project_id
        || config.default_owner != app.session.owner;

    app.session.project_id = config.default_project_id.clone();
    app.session.owner = config.default_owner.clone();
    app.session.item_limit = config.item_limit();
    app.session.exclude_done = config.default_exclude_done;
    app.session.suppress_hints = config.suppress_hints;
    app.session.iteration_filters = config.default_iteration_filters.clone();
    app.state.filter = with_iterations(&app.state.filter.raw, &config.default_iteration_filters);
    app.config = config;

    app.state.view = View::Board;
    app.state.mode = Mode::Normal;
    app.sync_focus();
    app.notify(Level::Info, "Settings saved successfully");

    if project_changed {
        app.project.id = app.session.project_id.clone();
        app.project.owner = app.session.owner.clone();
        app.reload();
    }
}
