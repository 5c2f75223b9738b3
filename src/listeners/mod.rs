//! # Event listeners.
//!
//! This module provides the [`Listen`] trait, closure adapters, and the
//! [`Callback`] handle used to register and remove listeners.
//!
//! ## Architecture
//! ```text
//! Callback { id, Arc<dyn Listen> }
//!     │
//!     ├──► Listen::on_event(Arc<Event>)
//!     │         │
//!     │    ┌────┴──────┬──────────────┬─────────────┐
//!     │    ▼           ▼              ▼             ▼
//!     │  ListenerFn  SyncListenerFn  LogListener  Custom
//!     │
//!     └──► CallbackId (identity used for dedup and removal)
//! ```

mod callback;
#[cfg(feature = "logging")]
mod log;
mod listener;
mod listener_fn;

pub use callback::{Callback, CallbackId};
pub use listener::Listen;
pub use listener_fn::{ListenerFn, SyncListenerFn};

#[cfg(feature = "logging")]
pub use log::LogListener;
