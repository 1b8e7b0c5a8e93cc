use futures::channel::oneshot;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::request::ConfirmId;

/// The caller's side of one confirmation. Resolves to `true` only when the
/// user explicitly confirmed; every other outcome, including the broker
/// going away, reads as `false`.
#[must_use = "a confirmation ticket does nothing unless awaited or polled"]
pub struct ConfirmTicket {
    id: ConfirmId,
    receiver: oneshot::Receiver<bool>,
    settled: Option<bool>,
}

impl ConfirmTicket {
    pub(super) fn new(id: ConfirmId, receiver: oneshot::Receiver<bool>) -> Self {
        Self {
            id,
            receiver,
            settled: None,
        }
    }

    pub fn id(&self) -> ConfirmId {
        self.id
    }

    /// Non-blocking check used to observe delivery without an executor.
    #[cfg(test)]
    pub fn try_result(&mut self) -> Option<bool> {
        if self.settled.is_some() {
            return self.settled;
        }
        let value = match self.receiver.try_recv() {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(oneshot::Canceled) => false,
        };
        self.settled = Some(value);
        self.settled
    }
}

impl Future for ConfirmTicket {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        if let Some(value) = self.settled {
            return Poll::Ready(value);
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(result) => {
                let value = result.unwrap_or(false);
                self.settled = Some(value);
                Poll::Ready(value)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
