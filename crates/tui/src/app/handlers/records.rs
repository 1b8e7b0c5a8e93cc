use crate::app::confirm::ConfirmOptions;
use crate::app::state::RecordStore;
use crate::app::AppState;
use crossterm::event::KeyCode;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub fn handle_records_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.screen.select_up();
            true
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.records_len();
            app.screen.select_down(len);
            true
        }
        KeyCode::Left | KeyCode::Char('[') => {
            app.switch_entity(app.screen.kind.previous());
            true
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.switch_entity(app.screen.kind.next());
            true
        }
        KeyCode::Char('d') | KeyCode::Delete => request_delete(app),
        KeyCode::Char('r') => request_reload(app),
        KeyCode::Char('q') => request_quit(app),
        _ => false,
    }
}

/// Asks before deleting the selected record. The record is only removed
/// after an explicit confirm; every other outcome keeps it.
pub fn request_delete(app: &AppState) -> bool {
    let kind = app.screen.kind;
    let Some(record) = app.selected_record() else {
        app.notices.info(format!("No {} selected", kind.singular()));
        return true;
    };

    let ticket = app.confirm.danger(
        ConfirmOptions::new(
            format!("Delete {}", kind.singular()),
            format!(
                "Delete {} \"{}\"? This cannot be undone.",
                kind.singular(),
                record.label
            ),
        )
        .confirm_label("Delete"),
    );
    debug!(id = %ticket.id(), record = %record.id, "delete confirmation requested");

    let store = Rc::clone(&app.store);
    let notices = app.notices.clone();
    app.spawn_local(async move {
        if !ticket.await {
            notices.info(format!("Kept {}", record.label));
            return;
        }
        let removed = store.borrow_mut().remove(kind, &record.id);
        match removed {
            Some(removed) => {
                info!(kind = ?kind, id = %removed.id, "record deleted");
                notices.success(format!("Deleted {}", removed.label));
            }
            None => notices.warning(format!("{} was already gone", record.label)),
        }
    });
    true
}

/// Throws away local deletions and reads the records again from where they
/// came from at startup.
pub fn request_reload(app: &AppState) -> bool {
    let source = app.records_path.clone();
    let origin = source
        .as_ref()
        .map_or_else(|| "the sample data".to_string(), |path| path.display().to_string());
    let ticket = app.confirm.warning(
        ConfirmOptions::new(
            "Reload records",
            format!("Discard local changes and reload from {origin}?"),
        )
        .confirm_label("Reload"),
    );

    let store = Rc::clone(&app.store);
    let notices = app.notices.clone();
    app.spawn_local(async move {
        if !ticket.await {
            return;
        }
        let loaded = match source.as_deref() {
            Some(path) => RecordStore::load(path),
            None => Ok(RecordStore::sample()),
        };
        match loaded {
            Ok(fresh) => {
                let total = fresh.total();
                *store.borrow_mut() = fresh;
                info!(total, "records reloaded");
                notices.success(format!("Reloaded {total} records"));
            }
            Err(error) => {
                warn!(%error, "records reload failed");
                notices.error(error.to_string());
            }
        }
    });
    true
}

pub fn request_quit(app: &AppState) -> bool {
    let ticket = app.confirm.info(
        ConfirmOptions::new("Leave Impact Auto", "Close the back office console?")
            .confirm_label("Quit")
            .cancel_label("Stay"),
    );
    let quit = Rc::clone(&app.quit_requested);
    app.spawn_local(async move {
        if ticket.await {
            quit.set(true);
        }
    });
    true
}
