//! Yes/no confirmations shown as stacked modals.
//!
//! Every request resolves exactly once: explicit confirm is `true`; cancel,
//! backdrop click, Escape, the safety timeout and `dismiss_all` are `false`.

mod broker;
mod request;
mod service;
mod ticket;

pub use broker::{BrokerConfig, ConfirmBroker, DEFAULT_EXIT_DELAY, DEFAULT_SAFETY_TIMEOUT};
pub use request::{ConfirmFocus, ConfirmKind, ConfirmOptions, ConfirmRequest, ModalBindings};
#[cfg(test)]
pub use request::{ConfirmId, ConfirmState, ConfirmTrigger};
pub use service::ConfirmService;
