//! Change notification for store subscribers.
//!
//! Best-effort broadcast: every subscriber gets a copy of every event,
//! dead subscribers are dropped at publish time. Events say *what kind*
//! of state changed; subscribers read the store for the current values.

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Kind of state change a subscriber can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// Products and categories were replaced by a completed load.
    CatalogReplaced,
    /// The cart changed (add, remove, quantity, clear, rehydrate).
    CartChanged,
    /// Selected category or search query changed.
    FilterChanged,
    /// The loading flag flipped.
    LoadingChanged,
    /// The error description changed.
    ErrorChanged,
}

/// A subscription to store change events.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<StoreEvent>,
}

impl Subscription {
    pub(crate) fn new(receiver: Receiver<StoreEvent>) -> Self {
        Self { receiver }
    }

    /// Block until the next event is available.
    pub fn recv(&self) -> Result<StoreEvent, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Result<StoreEvent, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<StoreEvent, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// In-process fan-out of change events.
#[derive(Debug, Default)]
pub(crate) struct ChangeBus {
    subscribers: Mutex<Vec<mpsc::Sender<StoreEvent>>>,
}

impl ChangeBus {
    pub(crate) fn publish(&self, event: StoreEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(event).is_ok());
        }
    }

    pub(crate) fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
