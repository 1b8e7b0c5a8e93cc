use crate::app::confirm::ConfirmFocus;
use crate::app::AppState;
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use std::time::Instant;

/// Keys go to the most recent pending confirmation. Returns `None` when no
/// modal is open; otherwise the key is consumed and the flag says whether
/// anything changed.
pub fn handle_confirm_key(app: &AppState, key: KeyCode, now: Instant) -> Option<bool> {
    if !app.confirm.has_pending() {
        return None;
    }
    let changed = app.confirm.with(|broker| match key {
        KeyCode::Esc => broker.escape(now),
        KeyCode::Enter | KeyCode::Char(' ') => broker.activate_focused(now),
        KeyCode::Tab | KeyCode::BackTab => broker.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => broker.set_focus(ConfirmFocus::Cancel),
        KeyCode::Right | KeyCode::Char('l') => broker.set_focus(ConfirmFocus::Confirm),
        KeyCode::Char('y') | KeyCode::Char('Y') => broker
            .active_id()
            .is_some_and(|id| broker.confirm(id, now)),
        KeyCode::Char('n') | KeyCode::Char('N') => broker
            .active_id()
            .is_some_and(|id| broker.cancel(id, now)),
        _ => false,
    });
    Some(changed)
}

/// Mouse input while any modal is on screen belongs to the top modal only,
/// including one that is still closing.
pub fn handle_confirm_mouse(
    app: &AppState,
    kind: MouseEventKind,
    column: u16,
    row: u16,
    now: Instant,
) -> Option<bool> {
    if app.confirm.visible_count() == 0 {
        return None;
    }
    let changed = match kind {
        MouseEventKind::Down(MouseButton::Left) => app.confirm.with(|broker| {
            let before = broker.pending_count();
            broker.click(column, row, now);
            broker.pending_count() != before
        }),
        _ => false,
    };
    Some(changed)
}

#[cfg(test)]
mod tests {
    use super::{handle_confirm_key, handle_confirm_mouse};
    use crate::app::confirm::{
        ConfirmFocus, ConfirmId, ConfirmOptions, ConfirmState, ConfirmTrigger, ModalBindings,
    };
    use crate::app::state::RecordStore;
    use crate::app::AppState;
    use crate::config::AppConfig;
    use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
    use ratatui::layout::Rect;
    use std::time::Instant;

    fn app() -> AppState {
        AppState::new(&AppConfig::default(), RecordStore::sample())
    }

    fn state_of(app: &AppState, id: ConfirmId) -> Option<ConfirmState> {
        app.confirm
            .with(|broker| broker.get(id).map(|request| request.state))
    }

    #[test]
    fn keys_fall_through_without_a_modal() {
        let app = app();
        assert_eq!(handle_confirm_key(&app, KeyCode::Char('d'), Instant::now()), None);
        let click = MouseEventKind::Down(MouseButton::Left);
        assert_eq!(handle_confirm_mouse(&app, click, 1, 1, Instant::now()), None);
    }

    #[test]
    fn unrelated_keys_are_swallowed_by_the_modal() {
        let app = app();
        let ticket = app.confirm.warning(ConfirmOptions::new("Archive", "Archive it?"));
        assert_eq!(
            handle_confirm_key(&app, KeyCode::Char('d'), Instant::now()),
            Some(false)
        );
        assert_eq!(state_of(&app, ticket.id()), Some(ConfirmState::Pending));
    }

    #[test]
    fn escape_cancels_the_most_recent_request() {
        let app = app();
        let first = app.confirm.warning(ConfirmOptions::new("First", "One?"));
        let second = app.confirm.warning(ConfirmOptions::new("Second", "Two?"));
        let now = Instant::now();
        assert_eq!(handle_confirm_key(&app, KeyCode::Esc, now), Some(true));
        assert_eq!(state_of(&app, first.id()), Some(ConfirmState::Pending));
        assert_eq!(
            state_of(&app, second.id()),
            Some(ConfirmState::Resolved {
                confirmed: false,
                trigger: ConfirmTrigger::Escape,
            })
        );
    }

    #[test]
    fn enter_on_a_danger_prompt_cancels_by_default() {
        let app = app();
        let ticket = app.confirm.danger(ConfirmOptions::new("Delete", "Delete it?"));
        handle_confirm_key(&app, KeyCode::Enter, Instant::now());
        assert_eq!(
            state_of(&app, ticket.id()),
            Some(ConfirmState::Resolved {
                confirmed: false,
                trigger: ConfirmTrigger::Cancel,
            })
        );
    }

    #[test]
    fn arrows_move_focus_before_enter() {
        let app = app();
        let ticket = app.confirm.danger(ConfirmOptions::new("Delete", "Delete it?"));
        let now = Instant::now();
        assert_eq!(handle_confirm_key(&app, KeyCode::Right, now), Some(true));
        let focus = app
            .confirm
            .with(|broker| broker.get(ticket.id()).map(|request| request.focus));
        assert_eq!(focus, Some(ConfirmFocus::Confirm));
        handle_confirm_key(&app, KeyCode::Enter, now);
        assert_eq!(
            state_of(&app, ticket.id()),
            Some(ConfirmState::Resolved {
                confirmed: true,
                trigger: ConfirmTrigger::Confirm,
            })
        );
    }

    #[test]
    fn y_and_n_shortcuts_resolve() {
        let app = app();
        let yes = app.confirm.request(ConfirmOptions::new("Save", "Save?"));
        handle_confirm_key(&app, KeyCode::Char('y'), Instant::now());
        assert!(matches!(
            state_of(&app, yes.id()),
            Some(ConfirmState::Resolved { confirmed: true, .. })
        ));

        let no = app.confirm.request(ConfirmOptions::new("Save", "Save?"));
        handle_confirm_key(&app, KeyCode::Char('n'), Instant::now());
        assert!(matches!(
            state_of(&app, no.id()),
            Some(ConfirmState::Resolved { confirmed: false, .. })
        ));
    }

    #[test]
    fn clicks_hit_the_top_modal_buttons() {
        let app = app();
        let ticket = app.confirm.info(ConfirmOptions::new("Sync", "Sync now?"));
        let id = ticket.id();
        app.confirm.with(|broker| {
            broker.attach_bindings(
                id,
                ModalBindings {
                    content: Rect::new(10, 5, 30, 6),
                    confirm_button: Rect::new(30, 9, 8, 1),
                    cancel_button: Rect::new(20, 9, 8, 1),
                },
            )
        });
        let now = Instant::now();
        let click = MouseEventKind::Down(MouseButton::Left);
        assert_eq!(handle_confirm_mouse(&app, click, 12, 6, now), Some(false));
        assert_eq!(
            handle_confirm_mouse(&app, MouseEventKind::Moved, 0, 0, now),
            Some(false)
        );
        assert_eq!(handle_confirm_mouse(&app, click, 31, 9, now), Some(true));
        assert_eq!(
            state_of(&app, id),
            Some(ConfirmState::Resolved {
                confirmed: true,
                trigger: ConfirmTrigger::Confirm,
            })
        );
        // The closing modal still owns the mouse until it is removed.
        assert_eq!(handle_confirm_mouse(&app, click, 0, 0, now), Some(false));
    }
}
