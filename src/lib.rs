//! # eventchain
//!
//! **eventchain** is an in-process publish/subscribe event dispatcher for
//! tokio applications.
//!
//! Producers dispatch named [`Event`]s carrying a key/value payload; every
//! listener registered for that name receives the event on its own task.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Producer   │   │   Producer   │   │   Producer   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ dispatch_event   ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Dispatcher (process-wide via Dispatcher::shared())               │
//! │  - chains: name → ListenerChain  (RwLock)                         │
//! │  - loops / invocations: TaskTrackers                              │
//! └──────┬──────────────────────────────────────────┬─────────────────┘
//!        ▼ "user.created"                           ▼ "order.paid"
//! ┌────────────────────────────┐          ┌────────────────────────────┐
//! │ ListenerChain (RwLock<Vec>)│          │ ListenerChain              │
//! └───┬────────────────┬───────┘          └───┬────────────────────────┘
//!     ▼                ▼                      ▼
//!  [conduit]        [conduit]              [conduit]      (single slot)
//!     ▼                ▼                      ▼
//!  delivery loop    delivery loop          delivery loop
//!     ▼ spawn          ▼ spawn                ▼ spawn
//!  on_event()       on_event()             on_event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! add_event_listener(name, cb) ──► chain.add_callback ──► spawn delivery loop
//!
//! loop {
//!   ├─► recv from conduit
//!   │       ├─ Event ──► spawn on_event(event) (panic caught) ──► continue
//!   │       └─ Stop  ──► exit
//!   └─ conduit closed ──► exit
//! }
//!
//! remove_event_listener(name, cb) ──► Stop ──► loop exits
//! init() / shutdown()              ──► Stop to every loop
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                         |
//! |-------------------|----------------------------------------------------------|--------------------------------------------|
//! | **Events**        | Named events with a JSON-like payload.                   | [`Event`], [`Payload`]                     |
//! | **Listeners**     | Async or sync closures, or custom types.                 | [`Listen`], [`ListenerFn`], [`Callback`]   |
//! | **Dispatch**      | Registration, removal, fan-out, reset, shutdown.         | [`Dispatcher`]                             |
//! | **Errors**        | Typed errors for queries and shutdown.                   | [`DispatchError`]                          |
//! | **Configuration** | Conduit capacity and shutdown grace.                     | [`DispatcherConfig`]                       |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogListener`] that traces every event it receives.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventchain::{Callback, Dispatcher, Event};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::shared();
//!
//!     let on_created = Callback::from_fn("greeter", |ev: Arc<Event>| async move {
//!         println!("welcome, user {:?}", ev.get("id"));
//!     });
//!     dispatcher.add_event_listener("user.created", &on_created).await;
//!
//!     dispatcher
//!         .dispatch_event(Event::named("user.created").with_param("id", 1000))
//!         .await;
//!
//!     dispatcher.remove_event_listener("user.created", &on_created).await;
//!     dispatcher.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use crate::core::{Dispatcher, DispatcherConfig};
pub use error::DispatchError;
pub use events::{Event, Payload};
pub use listeners::{Callback, CallbackId, Listen, ListenerFn, SyncListenerFn};

// Optional: expose a built-in tracing listener.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;
