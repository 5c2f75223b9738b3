//! # ListenerChain: subscriber set for one event name
//!
//! [`ListenerChain`] owns the ordered subscriptions of a single event name
//! and fans each event out to their conduits.
//!
//! ## What it guarantees
//! - Callback identities in a chain form a set (no duplicates).
//! - Insertion order is kept; removal preserves the order of survivors.
//! - `send_event_to_all` visits subscriptions in that order and waits for
//!   each conduit to accept the event, never for the listener to finish.
//!
//! ## Locking
//! Structural changes (add/remove/close) take the write lock; fan-out takes
//! the read lock. Dispatches for one name can overlap each other but never a
//! concurrent add/remove on the same name.
//!
//! ## Diagram
//! ```text
//!    send_event_to_all(ev)
//!        │                        (Arc-clone per subscription)
//!        ├────────────────► [conduit L1] ─► loop L1 ─► spawn on_event()
//!        ├────────────────► [conduit L2] ─► loop L2 ─► spawn on_event()
//!        └────────────────► [conduit LN] ─► loop LN ─► spawn on_event()
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::conduit::{conduit, ConduitRx, ConduitTx, Delivery};
use crate::events::Event;
use crate::listeners::{Callback, CallbackId};

/// One registered callback bound to its private conduit.
struct Subscription {
    callback: Callback,
    conduit: ConduitTx,
}

/// Ordered subscriptions for one event name.
pub(crate) struct ListenerChain {
    name: Arc<str>,
    conduit_capacity: usize,
    subs: RwLock<Vec<Subscription>>,
}

impl ListenerChain {
    pub(crate) fn new(name: Arc<str>, conduit_capacity: usize) -> Self {
        Self {
            name,
            conduit_capacity: conduit_capacity.max(1),
            subs: RwLock::new(Vec::new()),
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Appends a subscription and returns the receiving half of its conduit.
    ///
    /// The existence check runs under the same write guard as the append, so
    /// two racing registrations of one callback cannot both succeed. Returns
    /// `None` if the callback is already subscribed.
    pub(crate) async fn add_callback(&self, cb: Callback) -> Option<ConduitRx> {
        let mut subs = self.subs.write().await;
        if subs.iter().any(|s| s.callback == cb) {
            return None;
        }

        let (tx, rx) = conduit(self.conduit_capacity);
        subs.push(Subscription {
            callback: cb,
            conduit: tx,
        });
        Some(rx)
    }

    /// Write lock even though read-only, so it serializes with add/remove.
    pub(crate) async fn callback_exists(&self, cb: &Callback) -> bool {
        let subs = self.subs.write().await;
        subs.iter().any(|s| s.callback == *cb)
    }

    /// Stops and removes the subscription of `cb`.
    ///
    /// `Stop` is sent before the entry is dropped so the loop ends after any
    /// event already waiting in the conduit. Returns `false` if `cb` was not
    /// subscribed.
    pub(crate) async fn remove_callback(&self, cb: &Callback) -> bool {
        let mut subs = self.subs.write().await;
        let Some(idx) = subs.iter().position(|s| s.callback == *cb) else {
            return false;
        };

        // Err means the loop is already gone; nothing left to stop.
        let _ = subs[idx].conduit.send(Delivery::Stop).await;
        subs.remove(idx);
        true
    }

    /// Hands `event` to every subscription in order.
    pub(crate) async fn send_event_to_all(&self, event: Arc<Event>) {
        let subs = self.subs.read().await;
        for sub in subs.iter() {
            if sub
                .conduit
                .send(Delivery::Event(Arc::clone(&event)))
                .await
                .is_err()
            {
                tracing::debug!(
                    event = %self.name,
                    seq = event.seq(),
                    callback = %sub.callback.name(),
                    callback_id = %sub.callback.id(),
                    "delivery loop gone; event dropped for this listener"
                );
            }
        }
    }

    /// Stops every delivery loop and empties the chain.
    pub(crate) async fn close(&self) -> usize {
        let drained: Vec<Subscription> = {
            let mut subs = self.subs.write().await;
            subs.drain(..).collect()
        };

        for sub in &drained {
            let _ = sub.conduit.send(Delivery::Stop).await;
        }
        drained.len()
    }

    pub(crate) async fn len(&self) -> usize {
        self.subs.read().await.len()
    }

    /// Subscribed identities in insertion order.
    pub(crate) async fn callback_ids(&self) -> Vec<CallbackId> {
        self.subs.read().await.iter().map(|s| s.callback.id()).collect()
    }
}
