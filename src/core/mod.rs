//! Dispatch core: chains, conduits and the dispatcher.
//!
//! The only public API from this module is [`Dispatcher`] and its
//! [`DispatcherConfig`].
//!
//! Internal modules:
//! - [`chain`]: ordered subscriptions for one event name and fan-out;
//! - [`conduit`]: per-subscription channel, `Delivery` messages and the delivery loop;
//! - [`dispatcher`]: name → chain directory, process-wide instance;
//! - [`config`]: dispatcher settings.

mod chain;
mod conduit;
mod config;
mod dispatcher;

pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
