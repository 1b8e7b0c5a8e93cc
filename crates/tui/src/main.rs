mod app;
mod config;
mod error;
mod logging;

use crate::app::handlers::confirm::{handle_confirm_key, handle_confirm_mouse};
use crate::app::handlers::records::handle_records_key;
use crate::app::state::RecordStore;
use crate::app::view::ui::draw_ui;
use crate::app::AppState;
use crate::config::AppConfig;
use crate::error::ConsoleError;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const IDLE_POLL: Duration = Duration::from_millis(50);

struct KeyDebugLog {
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
}

impl KeyDebugLog {
    fn from_event(event: &crossterm::event::KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
            kind: event.kind,
        }
    }
}

impl fmt::Display for KeyDebugLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code={:?} mods={:?} kind={:?}",
            self.code, self.modifiers, self.kind
        )
    }
}

fn apply_redraw(needs_redraw: &mut bool, redraw: bool) {
    if redraw {
        *needs_redraw = true;
    }
}

/// Sleep no longer than the next timer the app cares about.
fn poll_timeout(app: &AppState, now: Instant) -> Duration {
    app.next_wakeup()
        .map(|at| at.saturating_duration_since(now))
        .unwrap_or(IDLE_POLL)
        .min(IDLE_POLL)
}

fn is_ctrl_c(code: KeyCode, modifiers: KeyModifiers) -> bool {
    code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)
}

fn handle_key(app: &mut AppState, key: KeyCode, now: Instant) -> bool {
    if let Some(redraw) = handle_confirm_key(app, key, now) {
        return redraw;
    }
    handle_records_key(app, key)
}

fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent, now: Instant) -> bool {
    if let Some(redraw) = handle_confirm_mouse(app, mouse.kind, mouse.column, mouse.row, now) {
        return redraw;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => handle_records_key(app, KeyCode::Up),
        MouseEventKind::ScrollDown => handle_records_key(app, KeyCode::Down),
        _ => false,
    }
}

struct TerminalRestoreGuard;

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = std::io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env_and_args()?;
    let logging_enabled = logging::init_tracing(&config)?;
    for warning in &config.warnings {
        if logging_enabled {
            warn!("{warning}");
        } else {
            eprintln!("impact-tui: {warning}");
        }
    }

    let store = match config.records_path.as_deref() {
        Some(path) => RecordStore::load(path)?,
        None => RecordStore::sample(),
    };
    info!(
        records = store.total(),
        timeout_secs = config.safety_timeout.as_secs(),
        "console starting"
    );
    let mut app = AppState::new(&config, store);
    let outcome = run_terminal(&mut app);

    // Abandoned prompts still answer their callers before the process exits.
    let dismissed = app.confirm.dismiss_all();
    app.tick(Instant::now());
    info!(dismissed, "console closed");
    outcome?;
    Ok(())
}

fn run_terminal(app: &mut AppState) -> Result<(), ConsoleError> {
    let _restore_guard = TerminalRestoreGuard;
    let mut stdout = std::io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let _ = stdout.execute(EnableMouseCapture);
    let _ = stdout.execute(Hide);
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|f| draw_ui(f, app))?;
            needs_redraw = false;
        }
        if app.should_quit() {
            return Ok(());
        }

        if event::poll(poll_timeout(app, Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.key_debug {
                        debug!("key: {}", KeyDebugLog::from_event(&key));
                    }
                    if is_ctrl_c(key.code, key.modifiers) {
                        return Ok(());
                    }
                    apply_redraw(&mut needs_redraw, handle_key(app, key.code, Instant::now()));
                }
                Event::Mouse(mouse) => {
                    apply_redraw(
                        &mut needs_redraw,
                        handle_mouse_event(app, mouse, Instant::now()),
                    );
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }

        apply_redraw(&mut needs_redraw, app.tick(Instant::now()));
    }
}
