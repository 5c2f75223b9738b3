//! Event data model.
//!
//! ## Contents
//! - [`Event`] immutable named event with a key/value payload
//! - [`Payload`] the payload map (`String` → `serde_json::Value`)
//!
//! Events are produced by application code and handed to
//! [`Dispatcher::dispatch_event`](crate::Dispatcher::dispatch_event), which
//! wraps them in an `Arc` and fans them out to every listener of that name.

mod event;

pub use event::{Event, Payload};
