use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use super::broker::{BrokerConfig, ConfirmBroker};
use super::request::{ConfirmKind, ConfirmOptions};
use super::ticket::ConfirmTicket;

/// Shared handle on the console's single broker. Screens receive a clone
/// instead of reaching for a global.
#[derive(Clone, Default)]
pub struct ConfirmService {
    broker: Rc<RefCell<ConfirmBroker>>,
}

impl ConfirmService {
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            broker: Rc::new(RefCell::new(ConfirmBroker::new(config))),
        }
    }

    pub fn request(&self, options: ConfirmOptions) -> ConfirmTicket {
        self.broker.borrow_mut().request(options, Instant::now())
    }

    pub fn warning(&self, options: ConfirmOptions) -> ConfirmTicket {
        self.request(options.kind(ConfirmKind::Warning))
    }

    pub fn danger(&self, options: ConfirmOptions) -> ConfirmTicket {
        self.request(options.kind(ConfirmKind::Danger))
    }

    pub fn info(&self, options: ConfirmOptions) -> ConfirmTicket {
        self.request(options.kind(ConfirmKind::Info))
    }

    pub fn dismiss_all(&self) -> usize {
        self.broker.borrow_mut().dismiss_all()
    }

    pub fn tick(&self, now: Instant) -> bool {
        self.broker.borrow_mut().tick(now)
    }

    /// Runs `f` against the broker. Never hold the borrow across an `.await`.
    pub fn with<R>(&self, f: impl FnOnce(&mut ConfirmBroker) -> R) -> R {
        f(&mut self.broker.borrow_mut())
    }

    pub fn has_pending(&self) -> bool {
        self.broker.borrow().has_pending()
    }

    pub fn visible_count(&self) -> usize {
        self.broker.borrow().visible_count()
    }
}
