//! Pending-response table
//!
//! Maps the opaque of every outstanding synchronous request to a one-shot
//! slot the receive loop fills. Entries are removed by the waiter through
//! `PendingGuard`, whatever way the wait ends.

use std::collections::HashMap;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use crate::protocol::Command;

/// Outcome of handing a decoded response to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No waiter registered for the opaque (timed out, or never ours)
    NoWaiter,
    /// The waiter already received a response for this opaque
    Duplicate,
}

#[derive(Default)]
pub struct ResponseTable {
    slots: Mutex<HashMap<i32, Sender<Command>>>,
}

impl ResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slot for `opaque`; the returned guard unregisters on drop
    pub fn register(&self, opaque: i32) -> PendingGuard<'_> {
        let (tx, rx) = channel::bounded(1);
        if self.slots.lock().insert(opaque, tx).is_some() {
            tracing::warn!("Opaque {} re-registered while still pending", opaque);
        }
        PendingGuard {
            table: self,
            opaque,
            receiver: rx,
        }
    }

    /// Deliver a response without blocking
    pub fn complete(&self, response: Command) -> Delivery {
        let opaque = response.opaque();
        let slots = self.slots.lock();
        let Some(slot) = slots.get(&opaque) else {
            return Delivery::NoWaiter;
        };

        match slot.try_send(response) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Duplicate,
            Err(TrySendError::Disconnected(_)) => Delivery::NoWaiter,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    fn remove(&self, opaque: i32) {
        self.slots.lock().remove(&opaque);
    }
}

/// A registered slot; dropping it removes the table entry
pub struct PendingGuard<'a> {
    table: &'a ResponseTable,
    opaque: i32,
    receiver: Receiver<Command>,
}

impl PendingGuard<'_> {
    pub fn receiver(&self) -> &Receiver<Command> {
        &self.receiver
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.table.remove(self.opaque);
    }
}
