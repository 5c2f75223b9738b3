//! # Closure-backed listeners
//!
//! [`ListenerFn`] wraps an async closure `F: Fn(Arc<Event>) -> Fut`, producing a
//! fresh future per event. [`SyncListenerFn`] wraps a plain `Fn(&Event)` for
//! listeners that do not await anything.
//!
//! ## Concurrency semantics
//! - Each invocation creates a **new** future that owns its own `Arc<Event>`.
//! - No hidden mutation between invocations; share state through `Arc<...>`
//!   captured by the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventchain::{Event, Listen, ListenerFn};
//!
//! let l = ListenerFn::new("printer", |ev: Arc<Event>| async move {
//!     println!("got {}", ev.name());
//! });
//! assert_eq!(l.name(), "printer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;
use crate::listeners::Listen;

/// Async function-backed listener.
#[derive(Debug)]
pub struct ListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ListenerFn<F> {
    /// Creates a new function-backed listener.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

#[async_trait]
impl<F, Fut> Listen for ListenerFn<F>
where
    F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_event(&self, event: Arc<Event>) {
        (self.f)(event).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Synchronous function-backed listener.
///
/// Runs on the invocation task; keep it short or move heavy work to
/// `tokio::task::spawn_blocking`.
#[derive(Debug)]
pub struct SyncListenerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncListenerFn<F> {
    /// Creates a new synchronous listener.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

#[async_trait]
impl<F> Listen for SyncListenerFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    async fn on_event(&self, event: Arc<Event>) {
        (self.f)(&event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
