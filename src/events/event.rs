//! # Named events dispatched to listeners.
//!
//! An [`Event`] carries a name (used to pick the listener chain) and a
//! [`Payload`] of arbitrary JSON-like values. Events are created by the
//! producer right before dispatch, shared with every listener as
//! `Arc<Event>`, and dropped once the last listener invocation finishes.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore creation order when inspecting events received by
//! different listeners.
//!
//! ## Example
//! ```rust
//! use eventchain::Event;
//! use serde_json::json;
//!
//! let ev = Event::named("user.created")
//!     .with_param("id", json!(1000))
//!     .with_param("email", json!("user@example.com"));
//!
//! assert_eq!(ev.name(), "user.created");
//! assert_eq!(ev.get("id"), Some(&json!(1000)));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use serde_json::Value;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Key/value payload carried by an [`Event`].
pub type Payload = HashMap<String, Value>;

/// Immutable named event with payload metadata.
///
/// - `name`: selects which listener chain receives the event
/// - `payload`: read-only data for listeners
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    name: Arc<str>,
    payload: Payload,
    seq: u64,
    at: SystemTime,
}

impl Event {
    /// Creates a new event with the current timestamp and next sequence number.
    ///
    /// No validation: the name may be empty and the payload may be empty.
    pub fn new(name: impl Into<Arc<str>>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
        }
    }

    /// Creates an event with an empty payload.
    #[inline]
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, Payload::new())
    }

    /// Attaches a payload entry, replacing any previous value under `key`.
    #[inline]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Event name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full payload.
    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Looks up a single payload value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }
}
