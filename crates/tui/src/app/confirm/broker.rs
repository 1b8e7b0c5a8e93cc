use futures::channel::oneshot;
use std::time::{Duration, Instant};
use tracing::debug;

use super::request::{
    ConfirmFocus, ConfirmId, ConfirmOptions, ConfirmRequest, ConfirmState, ConfirmTrigger,
    ModalBindings, ModalHit,
};
use super::ticket::ConfirmTicket;

pub const DEFAULT_SAFETY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerConfig {
    pub safety_timeout: Duration,
    pub exit_delay: Duration,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            safety_timeout: DEFAULT_SAFETY_TIMEOUT,
            exit_delay: DEFAULT_EXIT_DELAY,
        }
    }
}

/// Owns every open confirmation, oldest first. The last pending entry is the
/// active one: it receives keys and clicks.
///
/// A request moves `Pending -> Resolved` once. Resolving drops its deadline
/// and bindings immediately; the element stays visible for `exit_delay`, then
/// `tick` removes it and fulfils the caller's ticket.
pub struct ConfirmBroker {
    config: BrokerConfig,
    next_id: u64,
    requests: Vec<ConfirmRequest>,
}

impl Default for ConfirmBroker {
    fn default() -> Self {
        Self::new(BrokerConfig::default())
    }
}

impl ConfirmBroker {
    pub fn new(config: BrokerConfig) -> Self {
        Self {
            config,
            next_id: 0,
            requests: Vec::new(),
        }
    }

    pub fn request(&mut self, options: ConfirmOptions, now: Instant) -> ConfirmTicket {
        self.next_id = self.next_id.wrapping_add(1);
        let id = ConfirmId::new(self.next_id);
        let (tx, rx) = oneshot::channel();
        let request = ConfirmRequest::new(id, options, now, now + self.config.safety_timeout, tx);
        debug!(
            %id,
            kind = ?request.kind,
            title = %request.title,
            open = self.pending_count() + 1,
            "confirmation requested"
        );
        self.requests.push(request);
        ConfirmTicket::new(id, rx)
    }

    pub fn confirm(&mut self, id: ConfirmId, now: Instant) -> bool {
        self.resolve(id, ConfirmTrigger::Confirm, now)
    }

    pub fn cancel(&mut self, id: ConfirmId, now: Instant) -> bool {
        self.resolve(id, ConfirmTrigger::Cancel, now)
    }

    pub fn backdrop(&mut self, id: ConfirmId, now: Instant) -> bool {
        self.resolve(id, ConfirmTrigger::Backdrop, now)
    }

    /// Escape only ever targets the most recently opened pending request.
    pub fn escape(&mut self, now: Instant) -> bool {
        match self.active_id() {
            Some(id) => self.resolve(id, ConfirmTrigger::Escape, now),
            None => false,
        }
    }

    pub fn focus_next(&mut self) -> bool {
        let Some(request) = self.active_mut() else {
            return false;
        };
        request.focus = request.focus.toggled();
        true
    }

    pub fn set_focus(&mut self, focus: ConfirmFocus) -> bool {
        let Some(request) = self.active_mut() else {
            return false;
        };
        request.focus = focus;
        true
    }

    pub fn activate_focused(&mut self, now: Instant) -> bool {
        let Some((id, focus)) = self.active().map(|request| (request.id, request.focus)) else {
            return false;
        };
        let trigger = match focus {
            ConfirmFocus::Confirm => ConfirmTrigger::Confirm,
            ConfirmFocus::Cancel => ConfirmTrigger::Cancel,
        };
        self.resolve(id, trigger, now)
    }

    /// Routes a click to the topmost modal on screen. Returns `false` when no
    /// modal is visible, so the click can fall through to the screen underneath.
    pub fn click(&mut self, column: u16, row: u16, now: Instant) -> bool {
        let Some(top) = self.requests.last() else {
            return false;
        };
        // A closing modal still covers the ones below it, with its bindings gone.
        if !top.is_pending() {
            return true;
        }
        let id = top.id;
        // Not rendered yet: nothing to aim at, but the modal still owns the input.
        let Some(bindings) = top.bindings else {
            return true;
        };
        match bindings.hit(column, row) {
            ModalHit::ConfirmButton => {
                self.confirm(id, now);
            }
            ModalHit::CancelButton => {
                self.cancel(id, now);
            }
            ModalHit::Backdrop => {
                self.backdrop(id, now);
            }
            ModalHit::Content => {}
        }
        true
    }

    pub fn attach_bindings(&mut self, id: ConfirmId, bindings: ModalBindings) {
        if let Some(request) = self.pending_mut(id) {
            request.bindings = Some(bindings);
        }
    }

    /// Expires overdue requests and removes those whose exit transition is
    /// over. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let overdue: Vec<ConfirmId> = self
            .requests
            .iter()
            .filter(|request| request.deadline.is_some_and(|deadline| deadline <= now))
            .map(|request| request.id)
            .collect();
        let mut changed = false;
        for id in overdue {
            changed |= self.resolve(id, ConfirmTrigger::Timeout, now);
        }

        let before = self.requests.len();
        let mut finished = Vec::new();
        let mut index = 0;
        while index < self.requests.len() {
            let done = self.requests[index]
                .closing_until
                .is_some_and(|until| until <= now);
            if done {
                finished.push(self.requests.remove(index));
            } else {
                index += 1;
            }
        }
        for request in finished {
            fulfil(request);
        }
        changed || self.requests.len() != before
    }

    /// Resolves every pending request with `false` and drops every element
    /// immediately, skipping exit transitions.
    pub fn dismiss_all(&mut self) -> usize {
        let mut dismissed = 0;
        for request in self.requests.iter_mut() {
            if request.is_pending() {
                mark_resolved(request, ConfirmTrigger::Dismissed);
                dismissed += 1;
            }
        }
        if !self.requests.is_empty() {
            debug!(dismissed, removed = self.requests.len(), "confirmations dismissed");
        }
        for request in self.requests.drain(..) {
            fulfil(request);
        }
        dismissed
    }

    pub fn pending_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|request| request.is_pending())
            .count()
    }

    pub fn visible_count(&self) -> usize {
        self.requests.len()
    }

    pub fn has_pending(&self) -> bool {
        self.requests.iter().any(ConfirmRequest::is_pending)
    }

    pub fn active_id(&self) -> Option<ConfirmId> {
        self.active().map(|request| request.id)
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: ConfirmId) -> bool {
        self.get(id).is_some_and(ConfirmRequest::is_pending)
    }

    #[cfg(test)]
    pub fn get(&self, id: ConfirmId) -> Option<&ConfirmRequest> {
        self.requests.iter().find(|request| request.id == id)
    }

    /// Requests in paint order, bottom first.
    pub fn visible(&self) -> impl Iterator<Item = &ConfirmRequest> {
        self.requests.iter()
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.requests
            .iter()
            .filter_map(|request| request.deadline.or(request.closing_until))
            .min()
    }

    fn active(&self) -> Option<&ConfirmRequest> {
        self.requests.iter().rev().find(|request| request.is_pending())
    }

    fn active_mut(&mut self) -> Option<&mut ConfirmRequest> {
        self.requests
            .iter_mut()
            .rev()
            .find(|request| request.is_pending())
    }

    fn pending_mut(&mut self, id: ConfirmId) -> Option<&mut ConfirmRequest> {
        self.requests
            .iter_mut()
            .find(|request| request.id == id && request.is_pending())
    }

    fn resolve(&mut self, id: ConfirmId, trigger: ConfirmTrigger, now: Instant) -> bool {
        let exit_delay = self.config.exit_delay;
        let Some(request) = self.pending_mut(id) else {
            return false;
        };
        mark_resolved(request, trigger);
        request.closing_until = Some(now + exit_delay);
        debug!(
            %id,
            ?trigger,
            confirmed = trigger.outcome(),
            open_for_ms = now.saturating_duration_since(request.created_at).as_millis() as u64,
            "confirmation resolved"
        );
        true
    }
}

fn mark_resolved(request: &mut ConfirmRequest, trigger: ConfirmTrigger) {
    request.state = ConfirmState::Resolved {
        confirmed: trigger.outcome(),
        trigger,
    };
    request.deadline = None;
    request.bindings = None;
}

fn fulfil(mut request: ConfirmRequest) {
    let confirmed = request.resolution().unwrap_or(false);
    if let Some(resolver) = request.resolver.take() {
        // The caller may have stopped waiting; that is not our concern.
        let _ = resolver.send(confirmed);
    }
}

#[cfg(test)]
mod tests {
    use super::{BrokerConfig, ConfirmBroker};
    use crate::app::confirm::{
        ConfirmFocus, ConfirmKind, ConfirmOptions, ConfirmState, ConfirmTrigger, ModalBindings,
    };
    use futures::executor::block_on;
    use ratatui::layout::Rect;
    use std::time::{Duration, Instant};

    const EXIT: Duration = Duration::from_millis(200);
    const TIMEOUT: Duration = Duration::from_secs(30);

    fn broker() -> ConfirmBroker {
        ConfirmBroker::new(BrokerConfig {
            safety_timeout: TIMEOUT,
            exit_delay: EXIT,
        })
    }

    fn bindings() -> ModalBindings {
        ModalBindings {
            content: Rect::new(20, 8, 40, 9),
            confirm_button: Rect::new(44, 15, 12, 1),
            cancel_button: Rect::new(28, 15, 12, 1),
        }
    }

    #[test]
    fn confirm_click_resolves_true_and_removes_modal() {
        let start = Instant::now();
        let mut broker = broker();
        let mut ticket = broker.request(
            ConfirmOptions::new("Delete item", "Are you sure?").kind(ConfirmKind::Danger),
            start,
        );
        let id = ticket.id();
        broker.attach_bindings(id, bindings());

        assert!(broker.click(45, 15, start));
        assert_eq!(broker.pending_count(), 0);
        // Exit transition still running, result not delivered yet.
        assert_eq!(ticket.try_result(), None);

        assert!(broker.tick(start + EXIT));
        assert_eq!(broker.visible_count(), 0);
        assert!(broker.get(id).is_none());

        assert!(!broker.click(45, 15, start + EXIT));
        assert!(block_on(ticket));
    }

    #[test]
    fn first_trigger_wins_and_later_ones_are_ignored() {
        let start = Instant::now();
        let mut broker = broker();
        let mut ticket = broker.request(ConfirmOptions::default(), start);
        let id = ticket.id();

        assert!(broker.cancel(id, start));
        assert!(!broker.confirm(id, start));
        assert!(!broker.escape(start));
        assert!(!broker.backdrop(id, start));
        assert_eq!(
            broker.get(id).map(|request| request.state),
            Some(ConfirmState::Resolved {
                confirmed: false,
                trigger: ConfirmTrigger::Cancel,
            })
        );

        broker.tick(start + TIMEOUT + EXIT);
        assert_eq!(ticket.try_result(), Some(false));
        assert!(!broker.confirm(id, start + TIMEOUT + EXIT));
        assert_eq!(ticket.try_result(), Some(false));
    }

    #[test]
    fn resolving_one_request_leaves_the_other_pending() {
        let start = Instant::now();
        let mut broker = broker();
        let mut first = broker.request(ConfirmOptions::new("A", "first"), start);
        let mut second = broker.request(ConfirmOptions::new("B", "second"), start);

        assert!(broker.confirm(first.id(), start));
        broker.tick(start + EXIT);

        assert_eq!(first.try_result(), Some(true));
        assert_eq!(second.try_result(), None);
        assert!(broker.is_pending(second.id()));
        assert_eq!(broker.active_id(), Some(second.id()));

        assert!(broker.cancel(second.id(), start + EXIT));
        broker.tick(start + EXIT + EXIT);
        assert_eq!(second.try_result(), Some(false));
        assert_eq!(first.try_result(), Some(true));
    }

    #[test]
    fn empty_options_use_defaults() {
        let start = Instant::now();
        let mut broker = broker();
        let confirmed = broker.request(ConfirmOptions::default(), start);
        let cancelled = broker.request(ConfirmOptions::default(), start);

        let request = broker.get(confirmed.id()).expect("request");
        assert_eq!(request.title, "Confirm action");
        assert_eq!(request.message, "Are you sure you want to continue?");
        assert_eq!(request.confirm_label, "Confirm");
        assert_eq!(request.cancel_label, "Cancel");
        assert_eq!(request.kind, ConfirmKind::Warning);

        broker.confirm(confirmed.id(), start);
        broker.cancel(cancelled.id(), start);
        broker.tick(start + EXIT);
        assert!(block_on(confirmed));
        assert!(!block_on(cancelled));
    }

    #[test]
    fn blank_strings_fall_back_to_defaults() {
        let start = Instant::now();
        let mut broker = broker();
        let ticket = broker.request(
            ConfirmOptions::new("   ", "").confirm_label("").cancel_label(" "),
            start,
        );
        let request = broker.get(ticket.id()).expect("request");
        assert_eq!(request.title, "Confirm action");
        assert_eq!(request.confirm_label, "Confirm");
        assert_eq!(request.cancel_label, "Cancel");
    }

    #[test]
    fn untouched_request_times_out_to_false_and_disappears() {
        let start = Instant::now();
        let mut broker = broker();
        let mut ticket = broker.request(ConfirmOptions::default(), start);
        let id = ticket.id();

        assert!(!broker.tick(start + TIMEOUT - Duration::from_millis(1)));
        assert!(broker.is_pending(id));

        assert!(broker.tick(start + TIMEOUT));
        assert_eq!(
            broker.get(id).map(|request| request.state),
            Some(ConfirmState::Resolved {
                confirmed: false,
                trigger: ConfirmTrigger::Timeout,
            })
        );
        broker.tick(start + TIMEOUT + EXIT);
        assert_eq!(broker.visible_count(), 0);
        assert_eq!(ticket.try_result(), Some(false));
    }

    #[test]
    fn escape_targets_only_the_most_recent_pending_request() {
        let start = Instant::now();
        let mut broker = broker();
        let mut older = broker.request(ConfirmOptions::new("Older", "one"), start);
        let mut newer = broker.request(ConfirmOptions::new("Newer", "two"), start);

        assert!(broker.escape(start));
        assert!(!broker.is_pending(newer.id()));
        assert!(broker.is_pending(older.id()));

        broker.tick(start + EXIT);
        assert_eq!(newer.try_result(), Some(false));
        assert_eq!(older.try_result(), None);
        assert_eq!(broker.active_id(), Some(older.id()));
    }

    #[test]
    fn escape_skips_requests_that_are_still_closing() {
        let start = Instant::now();
        let mut broker = broker();
        let older = broker.request(ConfirmOptions::new("Older", "one"), start);
        let newer = broker.request(ConfirmOptions::new("Newer", "two"), start);

        broker.confirm(newer.id(), start);
        assert_eq!(broker.visible_count(), 2);
        assert!(broker.escape(start));
        assert!(!broker.is_pending(older.id()));
        assert_eq!(
            broker.get(newer.id()).and_then(|request| request.resolution()),
            Some(true)
        );
    }

    #[test]
    fn resolution_drops_bindings_so_repeated_clicks_do_nothing() {
        let start = Instant::now();
        let mut broker = broker();
        let mut ticket = broker.request(ConfirmOptions::default(), start);
        let id = ticket.id();
        broker.attach_bindings(id, bindings());

        assert!(broker.click(30, 15, start));
        assert!(broker.get(id).and_then(|request| request.bindings()).is_none());
        // Still on screen while closing: the click is absorbed and changes nothing.
        assert!(broker.click(45, 15, start));
        assert_eq!(
            broker.get(id).map(|request| request.state),
            Some(ConfirmState::Resolved {
                confirmed: false,
                trigger: ConfirmTrigger::Cancel,
            })
        );
        broker.attach_bindings(id, bindings());
        assert!(broker.get(id).and_then(|request| request.bindings()).is_none());
        assert_eq!(broker.next_wakeup(), Some(start + EXIT));

        broker.tick(start + EXIT);
        assert_eq!(ticket.try_result(), Some(false));
    }

    #[test]
    fn clicks_route_to_the_top_request_only() {
        let start = Instant::now();
        let mut broker = broker();
        let lower = broker.request(ConfirmOptions::new("Lower", "one"), start);
        let upper = broker.request(ConfirmOptions::new("Upper", "two"), start);
        broker.attach_bindings(lower.id(), bindings());
        broker.attach_bindings(
            upper.id(),
            ModalBindings {
                content: Rect::new(22, 9, 40, 9),
                confirm_button: Rect::new(46, 16, 12, 1),
                cancel_button: Rect::new(30, 16, 12, 1),
            },
        );

        // Inside the upper modal's content: consumed, nothing resolves.
        assert!(broker.click(25, 10, start));
        assert!(broker.is_pending(upper.id()));
        assert!(broker.is_pending(lower.id()));

        // Outside everything: backdrop of the upper modal.
        assert!(broker.click(1, 1, start));
        assert!(!broker.is_pending(upper.id()));
        assert!(broker.is_pending(lower.id()));
    }

    #[test]
    fn closing_modal_shields_the_one_underneath() {
        let start = Instant::now();
        let mut broker = broker();
        let mut lower = broker.request(ConfirmOptions::new("Lower", "one"), start);
        let mut upper = broker.request(ConfirmOptions::new("Upper", "two"), start);
        broker.attach_bindings(lower.id(), bindings());
        broker.attach_bindings(upper.id(), bindings());

        // Double click on the backdrop, both inside the exit transition.
        assert!(broker.click(1, 1, start));
        assert!(broker.click(1, 1, start + EXIT / 2));
        assert!(!broker.is_pending(upper.id()));
        assert!(broker.is_pending(lower.id()));

        broker.tick(start + EXIT);
        assert_eq!(upper.try_result(), Some(false));
        assert_eq!(lower.try_result(), None);

        // Once the closing modal is gone, the lower one takes clicks again.
        assert!(broker.click(1, 1, start + EXIT));
        assert!(!broker.is_pending(lower.id()));
    }

    #[test]
    fn click_without_bindings_is_swallowed() {
        let start = Instant::now();
        let mut broker = broker();
        let ticket = broker.request(ConfirmOptions::default(), start);
        assert!(broker.click(0, 0, start));
        assert!(broker.is_pending(ticket.id()));
    }

    #[test]
    fn keyboard_focus_decides_enter() {
        let start = Instant::now();
        let mut broker = broker();
        let mut danger = broker.request(
            ConfirmOptions::new("Drop", "gone").kind(ConfirmKind::Danger),
            start,
        );
        assert_eq!(
            broker.get(danger.id()).map(|request| request.focus),
            Some(ConfirmFocus::Cancel)
        );
        assert!(broker.focus_next());
        assert!(broker.activate_focused(start));
        broker.tick(start + EXIT);
        assert_eq!(danger.try_result(), Some(true));

        let mut info = broker.request(
            ConfirmOptions::new("Sync", "now?").kind(ConfirmKind::Info),
            start,
        );
        assert!(broker.set_focus(ConfirmFocus::Cancel));
        assert!(broker.activate_focused(start));
        broker.tick(start + EXIT);
        assert_eq!(info.try_result(), Some(false));
        assert!(!broker.activate_focused(start));
    }

    #[test]
    fn dismiss_all_resolves_everything_and_clears_elements() {
        let start = Instant::now();
        let mut broker = broker();
        let mut confirmed = broker.request(ConfirmOptions::new("A", "a"), start);
        let mut open_a = broker.request(ConfirmOptions::new("B", "b"), start);
        let mut open_b = broker.request(ConfirmOptions::new("C", "c"), start);
        broker.confirm(confirmed.id(), start);

        assert_eq!(broker.dismiss_all(), 2);
        assert_eq!(broker.pending_count(), 0);
        assert_eq!(broker.visible_count(), 0);
        assert_eq!(broker.next_wakeup(), None);

        assert_eq!(confirmed.try_result(), Some(true));
        assert_eq!(open_a.try_result(), Some(false));
        assert_eq!(open_b.try_result(), Some(false));
        assert_eq!(broker.dismiss_all(), 0);
    }

    #[test]
    fn dropped_ticket_does_not_disturb_the_broker() {
        let start = Instant::now();
        let mut broker = broker();
        let ticket = broker.request(ConfirmOptions::default(), start);
        let id = ticket.id();
        drop(ticket);

        assert!(broker.confirm(id, start));
        assert!(broker.tick(start + EXIT));
        assert_eq!(broker.visible_count(), 0);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let start = Instant::now();
        let mut broker = broker();
        let first = broker.request(ConfirmOptions::default(), start).id();
        let second = broker.request(ConfirmOptions::default(), start).id();
        assert!(second > first);
        assert_eq!(first.to_string(), "confirm_1");
    }
}
