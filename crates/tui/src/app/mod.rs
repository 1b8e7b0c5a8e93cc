pub(crate) mod confirm;
pub(crate) mod handlers;
pub(crate) mod state;
pub(crate) mod util;
pub(crate) mod view;

use crate::app::confirm::ConfirmService;
use crate::app::state::{EntityKind, NotificationService, Record, RecordStore, RecordsScreen};
use crate::config::AppConfig;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

/// Composition root of the console. Everything here lives on the UI thread;
/// screen flows that wait for a decision run as tasks on `tasks`.
pub struct AppState {
    pub confirm: ConfirmService,
    pub notices: NotificationService,
    pub store: Rc<RefCell<RecordStore>>,
    /// Fixture the store was loaded from; `None` means the built-in sample.
    pub records_path: Option<PathBuf>,
    pub screen: RecordsScreen,
    pub key_debug: bool,
    pub quit_requested: Rc<Cell<bool>>,
    tasks: LocalPool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: RecordStore) -> Self {
        Self {
            confirm: ConfirmService::new(config.broker_config()),
            notices: NotificationService::default(),
            store: Rc::new(RefCell::new(store)),
            records_path: config.records_path.clone(),
            screen: RecordsScreen::default(),
            key_debug: config.key_debug,
            quit_requested: Rc::new(Cell::new(false)),
            tasks: LocalPool::new(),
        }
    }

    pub fn spawn_local(&self, task: impl Future<Output = ()> + 'static) {
        if let Err(error) = self.tasks.spawner().spawn_local(task) {
            warn!(%error, "could not schedule screen task");
            self.notices.error("Internal error: action could not be scheduled");
        }
    }

    /// Advances timers and lets woken screen tasks run. Returns whether the
    /// screen needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let confirm_changed = self.confirm.tick(now);
        self.tasks.run_until_stalled();
        let banner_expired = self.notices.expire(now);
        self.clamp_selection();
        confirm_changed || banner_expired
    }

    pub fn next_wakeup(&self) -> Option<Instant> {
        let banner = self.notices.current().map(|banner| banner.expires_at);
        let confirm = self.confirm.with(|broker| broker.next_wakeup());
        match (banner, confirm) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn records_len(&self) -> usize {
        self.store.borrow().list(self.screen.kind).len()
    }

    pub fn selected_record(&self) -> Option<Record> {
        self.store
            .borrow()
            .list(self.screen.kind)
            .get(self.screen.selected)
            .cloned()
    }

    pub fn clamp_selection(&mut self) {
        let len = self.records_len();
        self.screen.clamp(len);
    }

    /// Leaving a screen abandons whatever it was asking.
    pub fn switch_entity(&mut self, kind: EntityKind) {
        let dismissed = self.confirm.dismiss_all();
        if dismissed > 0 {
            debug!(dismissed, "navigation dismissed open confirmations");
        }
        self.screen = RecordsScreen { kind, selected: 0 };
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested.get()
    }
}
