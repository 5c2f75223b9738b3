//! # Delivery conduit and delivery loop.
//!
//! Every subscription owns a bounded channel (the conduit) and one delivery
//! loop reading from it:
//!
//! ```text
//! send_event_to_all ──► [conduit] ──► delivery_loop ──► spawn(invoke) ──► on_event()
//!                          ▲                   │
//! remove_callback ─ Stop ──┘                   └─► Stop / closed → exit
//! ```
//!
//! ## Loop states
//! - **Waiting**: parked on `recv()`.
//! - **Dispatching**: got `Delivery::Event`, spawns an invocation task and
//!   goes straight back to Waiting (never awaits the listener).
//! - **Stopped**: got `Delivery::Stop` or every sender is gone. Terminal.
//!
//! ## Rules
//! - Per-listener FIFO: the loop takes events in the order they were sent.
//! - `Stop` queues behind an already pending event.
//! - Listener panics are caught inside the invocation task.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::events::Event;
use crate::listeners::Callback;

/// Message carried by a conduit.
#[derive(Debug)]
pub(crate) enum Delivery {
    /// Deliver the event to the bound listener.
    Event(Arc<Event>),
    /// Terminate the delivery loop.
    Stop,
}

pub(crate) type ConduitTx = mpsc::Sender<Delivery>;
pub(crate) type ConduitRx = mpsc::Receiver<Delivery>;

/// Creates a fresh conduit with at least one slot.
pub(crate) fn conduit(capacity: usize) -> (ConduitTx, ConduitRx) {
    mpsc::channel(capacity.max(1))
}

/// Long-lived loop bound to one (event name, callback) subscription.
///
/// Each received event is handed to a new task on `invocations`.
pub(crate) async fn delivery_loop(
    event_name: Arc<str>,
    callback: Callback,
    mut rx: ConduitRx,
    invocations: TaskTracker,
) {
    tracing::trace!(event = %event_name, callback = %callback.name(), callback_id = %callback.id(), "delivery loop started");

    while let Some(msg) = rx.recv().await {
        match msg {
            Delivery::Event(ev) => {
                invocations.spawn(invoke(callback.clone(), ev));
            }
            Delivery::Stop => break,
        }
    }

    tracing::trace!(event = %event_name, callback = %callback.name(), callback_id = %callback.id(), "delivery loop stopped");
}

/// Runs one listener invocation, isolating panics.
async fn invoke(callback: Callback, ev: Arc<Event>) {
    let meta = Arc::clone(&ev);
    let fut = callback.listener().on_event(ev);

    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        let info = {
            let any = &*panic_err;
            if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            }
        };
        tracing::warn!(
            event = %meta.name(),
            seq = meta.seq(),
            callback = %callback.name(),
            callback_id = %callback.id(),
            panic = %info,
            "listener panicked"
        );
    }
}
