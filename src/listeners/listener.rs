//! # Event listener trait.
//!
//! Provides [`Listen`] the extension point for reacting to dispatched events.
//!
//! Each registered listener gets:
//! - **Dedicated delivery loop** (one per event name it is registered for)
//! - **Fresh task per event** (invocations never block the loop)
//! - **Panic isolation** (panics are caught and logged; the loop keeps running)
//!
//! ## Architecture
//! ```text
//! ListenerChain ──► [conduit] ──► delivery loop ──► spawn ──► listener.on_event()
//!                                                         └─► panic caught → warn!
//! ```
//!
//! ## Rules
//! - Events addressed to one name arrive at the loop in dispatch order.
//! - Invocations for consecutive events may overlap; `on_event` must be
//!   safe to run concurrently with itself.
//! - A slow listener only delays the handoff into its own conduit.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventchain::{Callback, Event, Listen};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Listen for Audit {
//!     async fn on_event(&self, ev: Arc<Event>) {
//!         let _ = ev.get("id");
//!     }
//!
//!     fn name(&self) -> &str { "audit" }
//! }
//!
//! let cb = Callback::new(Audit);
//! assert_eq!(cb.name(), "audit");
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;

/// Event listener invoked once per dispatched event.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; a panic is caught but the event is lost for this listener.
#[async_trait]
pub trait Listen: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from a task spawned by the delivery loop, never in the
    /// dispatcher's context.
    async fn on_event(&self, event: Arc<Event>);

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
