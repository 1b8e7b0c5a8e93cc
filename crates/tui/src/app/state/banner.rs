use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub const BANNER_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerTone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub tone: BannerTone,
    pub text: String,
    pub expires_at: Instant,
}

/// One-line notification slot under the record list. A newer message
/// replaces the current one.
#[derive(Clone, Default)]
pub struct NotificationService {
    current: Rc<RefCell<Option<Banner>>>,
}

impl NotificationService {
    pub fn show(&self, tone: BannerTone, text: impl Into<String>, now: Instant) {
        *self.current.borrow_mut() = Some(Banner {
            tone,
            text: text.into(),
            expires_at: now + BANNER_LIFETIME,
        });
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(BannerTone::Info, text, Instant::now());
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(BannerTone::Success, text, Instant::now());
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.show(BannerTone::Warning, text, Instant::now());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(BannerTone::Error, text, Instant::now());
    }

    pub fn current(&self) -> Option<Banner> {
        self.current.borrow().clone()
    }

    pub fn expire(&self, now: Instant) -> bool {
        let mut current = self.current.borrow_mut();
        if current.as_ref().is_some_and(|banner| banner.expires_at <= now) {
            *current = None;
            return true;
        }
        false
    }
}
