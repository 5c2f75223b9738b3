//! # Registration handle with stable identity.
//!
//! A [`Callback`] pairs a listener with a [`CallbackId`] allocated when the
//! handle is created. The dispatcher compares handles by id only:
//! - clones of one `Callback` are the **same** subscription (registering a
//!   clone again is a no-op; removing with a clone removes the original);
//! - two `Callback`s built from identical closures are **distinct**.
//!
//! ## Example
//! ```rust
//! use eventchain::{Callback, Event};
//!
//! let a = Callback::from_sync("a", |_ev: &Event| {});
//! let b = Callback::from_sync("a", |_ev: &Event| {});
//!
//! assert_eq!(a, a.clone());
//! assert_ne!(a, b);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::events::Event;
use crate::listeners::{Listen, ListenerFn, SyncListenerFn};

/// Global counter for callback identities.
static CALLBACK_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token of a [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(u64);

impl CallbackId {
    fn next() -> Self {
        Self(CALLBACK_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value (for logs).
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cb-{}", self.0)
    }
}

/// Shared listener handle passed to
/// [`Dispatcher::add_event_listener`](crate::Dispatcher::add_event_listener)
/// and [`Dispatcher::remove_event_listener`](crate::Dispatcher::remove_event_listener).
///
/// Cheap to clone (`Arc` + `u64`).
#[derive(Clone)]
pub struct Callback {
    id: CallbackId,
    listener: Arc<dyn Listen>,
}

impl Callback {
    /// Wraps a listener and allocates a fresh identity.
    pub fn new(listener: impl Listen) -> Self {
        Self::from_arc(Arc::new(listener))
    }

    /// Wraps an already shared listener and allocates a fresh identity.
    ///
    /// Identity belongs to the handle, not the listener: calling this twice
    /// with the same `Arc` yields two distinct callbacks.
    pub fn from_arc(listener: Arc<dyn Listen>) -> Self {
        Self {
            id: CallbackId::next(),
            listener,
        }
    }

    /// Builds a callback from an async closure.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use eventchain::{Callback, Event};
    ///
    /// let cb = Callback::from_fn("printer", |ev: Arc<Event>| async move {
    ///     println!("{}", ev.name());
    /// });
    /// assert_eq!(cb.name(), "printer");
    /// ```
    pub fn from_fn<F, Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(ListenerFn::new(name, f))
    }

    /// Builds a callback from a synchronous closure.
    pub fn from_sync<F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self::new(SyncListenerFn::new(name, f))
    }

    #[inline]
    pub fn id(&self) -> CallbackId {
        self.id
    }

    /// Listener name (for logs).
    #[inline]
    pub fn name(&self) -> &str {
        self.listener.name()
    }

    #[inline]
    pub(crate) fn listener(&self) -> &Arc<dyn Listen> {
        &self.listener
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Callback {}

impl Hash for Callback {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
