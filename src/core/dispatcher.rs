//! # Dispatcher: directory of listener chains
//!
//! [`Dispatcher`] maps event names to listener chains and is the entry point
//! for registration, removal and dispatch. One process-wide instance is
//! available through [`Dispatcher::shared`].
//!
//! ## Architecture
//! ```text
//! add_event_listener(name, cb)
//!     ├─► chains[name] (find or create)
//!     ├─► chain.add_callback(cb) ──► conduit rx
//!     └─► loops.spawn(delivery_loop(name, cb, rx))
//!
//! dispatch_event(ev)
//!     ├─► chains[ev.name] (missing → dropped)
//!     └─► chain.send_event_to_all(Arc<Event>)
//!
//! remove_event_listener(name, cb)
//!     └─► chain.remove_callback(cb) ──► Stop ──► loop exits
//! ```
//!
//! ## Rules
//! - The name → chain map is guarded by its own `RwLock`; it is always
//!   released before a chain lock is taken.
//! - Unknown names and unknown callbacks are silent no-ops.
//! - All operations must run inside a tokio runtime (they spawn tasks).

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tokio::sync::RwLock;
use tokio_util::task::TaskTracker;

use crate::core::chain::ListenerChain;
use crate::core::conduit::delivery_loop;
use crate::core::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::events::Event;
use crate::listeners::{Callback, CallbackId};

/// Process-wide instance behind [`Dispatcher::shared`].
static SHARED: OnceLock<Dispatcher> = OnceLock::new();

/// In-process publish/subscribe dispatcher.
///
/// ### Properties
/// - **Per-listener delivery loop**: each registration gets its own task.
/// - **Non-blocking invocation**: every event runs the listener on a fresh task.
/// - **Idempotent**: duplicate registration and unknown removal do nothing.
pub struct Dispatcher {
    chains: RwLock<HashMap<String, Arc<ListenerChain>>>,
    loops: TaskTracker,
    invocations: TaskTracker,
    cfg: DispatcherConfig,
}

impl Dispatcher {
    /// Creates an isolated dispatcher with the given configuration.
    ///
    /// Most applications use [`Dispatcher::shared`] instead.
    pub fn new(cfg: DispatcherConfig) -> Self {
        Self {
            chains: RwLock::new(HashMap::new()),
            loops: TaskTracker::new(),
            invocations: TaskTracker::new(),
            cfg,
        }
    }

    /// Returns the process-wide dispatcher, building it on first use.
    ///
    /// Concurrent first calls construct exactly one instance. It lives for the
    /// rest of the process; use [`init`](Self::init) to clear it between tests.
    ///
    /// ```rust
    /// use eventchain::Dispatcher;
    ///
    /// assert!(std::ptr::eq(Dispatcher::shared(), Dispatcher::shared()));
    /// ```
    pub fn shared() -> &'static Dispatcher {
        SHARED.get_or_init(|| Dispatcher::new(DispatcherConfig::default()))
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &DispatcherConfig {
        &self.cfg
    }

    /// Resets the name → chain map to empty.
    ///
    /// Every chain that was live is closed: each delivery loop receives
    /// `Stop` and exits. Listener invocations already running finish on
    /// their own.
    pub async fn init(&self) {
        let old = {
            let mut chains = self.chains.write().await;
            std::mem::take(&mut *chains)
        };

        let mut stopped = 0usize;
        for chain in old.values() {
            stopped += chain.close().await;
        }
        tracing::debug!(chains = old.len(), listeners = stopped, "dispatcher reset");
    }

    /// Registers `cb` for events named `name`.
    ///
    /// Returns `false` (and does nothing) if this callback is already
    /// registered for `name`.
    pub async fn add_event_listener(&self, name: &str, cb: &Callback) -> bool {
        let chain = self.chain_or_create(name).await;

        let Some(rx) = chain.add_callback(cb.clone()).await else {
            tracing::trace!(event = %name, callback = %cb.name(), callback_id = %cb.id(), "listener already registered");
            return false;
        };

        self.loops.spawn(delivery_loop(
            Arc::clone(chain.name()),
            cb.clone(),
            rx,
            self.invocations.clone(),
        ));
        tracing::debug!(event = %name, callback = %cb.name(), callback_id = %cb.id(), "listener added");
        true
    }

    /// Unregisters `cb` from `name` and stops its delivery loop.
    ///
    /// Returns `false` if the name or the callback is unknown.
    pub async fn remove_event_listener(&self, name: &str, cb: &Callback) -> bool {
        let Ok(chain) = self.chain(name).await else {
            return false;
        };

        let removed = chain.remove_callback(cb).await;
        if removed {
            tracing::debug!(event = %name, callback = %cb.name(), callback_id = %cb.id(), "listener removed");
        }
        removed
    }

    /// Hands `event` to every listener registered for its name.
    ///
    /// Returns once each listener's conduit has accepted the event; does not
    /// wait for the listeners themselves. Events without listeners are dropped.
    pub async fn dispatch_event(&self, event: Event) {
        let chain = {
            let chains = self.chains.read().await;
            chains.get(event.name()).cloned()
        };

        match chain {
            Some(chain) => chain.send_event_to_all(Arc::new(event)).await,
            None => {
                tracing::trace!(event = %event.name(), seq = event.seq(), "no listeners; event dropped");
            }
        }
    }

    /// Number of listeners registered for `name`.
    ///
    /// # Errors
    /// [`DispatchError::EventNotFound`] if no chain was ever created for `name`
    /// (since the last [`init`](Self::init)). A chain whose listeners were all
    /// removed reports `Ok(0)`.
    pub async fn listener_count(&self, name: &str) -> Result<usize, DispatchError> {
        let chain = self.chain(name).await?;
        Ok(chain.len().await)
    }

    /// Identities registered for `name`, in delivery order.
    ///
    /// # Errors
    /// [`DispatchError::EventNotFound`] if no chain exists for `name`.
    pub async fn listener_ids(&self, name: &str) -> Result<Vec<CallbackId>, DispatchError> {
        let chain = self.chain(name).await?;
        Ok(chain.callback_ids().await)
    }

    /// True if `cb` is currently registered for `name`.
    pub async fn has_event_listener(&self, name: &str, cb: &Callback) -> bool {
        match self.chain(name).await {
            Ok(chain) => chain.callback_exists(cb).await,
            Err(_) => false,
        }
    }

    /// Returns sorted list of event names that have a chain.
    pub async fn event_names(&self) -> Vec<String> {
        let chains = self.chains.read().await;
        let mut names: Vec<String> = chains.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Resets the dispatcher and waits for loops and listener invocations.
    ///
    /// Waits up to [`DispatcherConfig::grace`]. The dispatcher stays usable
    /// afterwards.
    ///
    /// # Errors
    /// [`DispatchError::GraceExceeded`] if tasks are still running when the
    /// grace period ends.
    pub async fn shutdown(&self) -> Result<(), DispatchError> {
        self.init().await;

        self.loops.close();
        self.invocations.close();
        let drained = tokio::time::timeout(self.cfg.grace, async {
            self.loops.wait().await;
            self.invocations.wait().await;
        })
        .await;
        let pending = self.loops.len() + self.invocations.len();
        self.loops.reopen();
        self.invocations.reopen();

        match drained {
            Ok(()) => {
                tracing::debug!("dispatcher drained");
                Ok(())
            }
            Err(_) => {
                tracing::warn!(grace = ?self.cfg.grace, pending, "dispatcher shutdown grace exceeded");
                Err(DispatchError::GraceExceeded {
                    grace: self.cfg.grace,
                    pending,
                })
            }
        }
    }

    async fn chain(&self, name: &str) -> Result<Arc<ListenerChain>, DispatchError> {
        let chains = self.chains.read().await;
        chains
            .get(name)
            .cloned()
            .ok_or_else(|| DispatchError::EventNotFound {
                name: name.to_string(),
            })
    }

    /// Read-lock fast path, write-lock `entry` on miss.
    async fn chain_or_create(&self, name: &str) -> Arc<ListenerChain> {
        if let Ok(chain) = self.chain(name).await {
            return chain;
        }

        let mut chains = self.chains.write().await;
        let capacity = self.cfg.conduit_capacity_clamped();
        Arc::clone(
            chains
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(ListenerChain::new(Arc::from(name), capacity))),
        )
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    const WAIT: Duration = Duration::from_secs(1);

    /// Listener that forwards every event into a channel.
    fn recorder(name: &'static str) -> (Callback, mpsc::UnboundedReceiver<Arc<Event>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cb = Callback::from_fn(name, move |ev: Arc<Event>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(ev);
            }
        });
        (cb, rx)
    }

    fn counter(hits: &Arc<AtomicUsize>) -> Callback {
        let h = Arc::clone(hits);
        Callback::from_sync("counter", move |_: &Event| {
            h.fetch_add(1, Ordering::SeqCst);
        })
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<Arc<Event>>) -> Arc<Event> {
        tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("listener not invoked in time")
            .expect("listener channel closed")
    }

    async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<Arc<Event>>) {
        let res = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(!matches!(res, Ok(Some(_))), "listener unexpectedly invoked");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fresh_dispatcher_is_empty() {
        let d = Dispatcher::default();
        assert!(d.event_names().await.is_empty());
        assert_eq!(
            d.listener_count("test").await,
            Err(DispatchError::EventNotFound {
                name: "test".into()
            })
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_single_listener_receives_payload() {
        let d = Dispatcher::default();
        let (cb, mut rx) = recorder("l1");
        assert!(d.add_event_listener("test", &cb).await);
        assert_eq!(d.listener_count("test").await, Ok(1));

        let ev = Event::named("test").with_param("id", 1000);
        let expected = ev.payload().clone();
        d.dispatch_event(ev).await;

        let got = recv(&mut rx).await;
        assert_eq!(got.name(), "test");
        assert_eq!(got.payload(), &expected);
        assert_eq!(got.get("id"), Some(&json!(1000)));
        assert_silent(&mut rx).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_duplicate_registration_is_idempotent() {
        let d = Dispatcher::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let cb = counter(&hits);

        assert!(d.add_event_listener("test", &cb).await);
        assert!(!d.add_event_listener("test", &cb).await);
        assert!(!d.add_event_listener("test", &cb.clone()).await);
        assert_eq!(d.listener_count("test").await, Ok(1));

        d.dispatch_event(Event::named("test")).await;
        d.shutdown().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_identical_closures_are_distinct_listeners() {
        let d = Dispatcher::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let a = counter(&hits);
        let b = counter(&hits);

        assert!(d.add_event_listener("test", &a).await);
        assert!(d.add_event_listener("test", &b).await);
        assert_eq!(d.listener_count("test").await, Ok(2));
        assert_eq!(d.listener_ids("test").await, Ok(vec![a.id(), b.id()]));

        d.remove_event_listener("test", &a).await;
        assert_eq!(d.listener_ids("test").await, Ok(vec![b.id()]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_two_listeners_each_invoked_once() {
        let d = Dispatcher::default();
        let (l1, mut rx1) = recorder("l1");
        let (l2, mut rx2) = recorder("l2");
        d.add_event_listener("test", &l1).await;
        d.add_event_listener("test", &l2).await;

        d.dispatch_event(Event::named("test").with_param("id", 1000)).await;

        let (e1, e2) = tokio::join!(recv(&mut rx1), recv(&mut rx2));
        assert_eq!(e1.seq(), e2.seq());
        assert_silent(&mut rx1).await;
        assert_silent(&mut rx2).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fan_out_to_many_listeners() {
        let d = Dispatcher::default();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..16 {
            d.add_event_listener("burst", &counter(&hits)).await;
        }

        d.dispatch_event(Event::named("burst")).await;
        d.shutdown().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 16);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_removed_listener_not_invoked() {
        let d = Dispatcher::default();
        let (cb, mut rx) = recorder("l1");
        d.add_event_listener("test", &cb).await;
        assert!(d.remove_event_listener("test", &cb).await);
        assert_eq!(d.listener_count("test").await, Ok(0));
        assert!(!d.has_event_listener("test", &cb).await);

        d.dispatch_event(Event::named("test")).await;
        assert_silent(&mut rx).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_is_idempotent() {
        let d = Dispatcher::default();
        let (cb, _rx) = recorder("l1");

        // unknown name
        assert!(!d.remove_event_listener("test", &cb).await);

        d.add_event_listener("test", &cb).await;
        assert!(d.remove_event_listener("test", &cb).await);
        assert!(!d.remove_event_listener("test", &cb).await);

        // unknown callback on a known name
        let (other, _rx2) = recorder("l2");
        assert!(!d.remove_event_listener("test", &other).await);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dispatch_without_listeners_is_dropped() {
        let d = Dispatcher::default();
        d.dispatch_event(Event::named("nobody")).await;
        assert!(d.event_names().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_names_are_isolated() {
        let d = Dispatcher::default();
        let (a, mut rx_a) = recorder("a");
        let (b, mut rx_b) = recorder("b");
        d.add_event_listener("A", &a).await;
        d.add_event_listener("B", &b).await;

        d.dispatch_event(Event::named("A")).await;
        assert_eq!(recv(&mut rx_a).await.name(), "A");
        assert_silent(&mut rx_b).await;
        assert_eq!(d.event_names().await, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_sequential_dispatches_all_delivered() {
        let d = Dispatcher::default();
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let o = Arc::clone(&order);
        // invocations run on separate tasks and may finish out of order
        let cb = Callback::from_sync("fifo", move |ev: &Event| {
            o.lock().unwrap().push(ev.seq());
        });
        d.add_event_listener("seq", &cb).await;

        let mut sent = Vec::new();
        for i in 0..20 {
            let ev = Event::named("seq").with_param("i", i);
            sent.push(ev.seq());
            d.dispatch_event(ev).await;
        }
        d.shutdown().await.unwrap();

        let mut got = order.lock().unwrap().clone();
        assert_eq!(got.len(), 20);
        got.sort_unstable();
        assert_eq!(got, sent);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_panicking_listener_keeps_receiving() {
        let d = Dispatcher::default();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let cb = Callback::from_sync("flaky", move |ev: &Event| {
            h.fetch_add(1, Ordering::SeqCst);
            if ev.get("boom").is_some() {
                panic!("listener failure");
            }
        });
        d.add_event_listener("test", &cb).await;

        d.dispatch_event(Event::named("test").with_param("boom", true)).await;
        d.dispatch_event(Event::named("test")).await;
        d.dispatch_event(Event::named("test").with_param("boom", true)).await;
        d.dispatch_event(Event::named("test")).await;

        d.shutdown().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_init_clears_and_stops_loops() {
        let d = Dispatcher::default();
        let (cb, mut rx) = recorder("l1");
        d.add_event_listener("test", &cb).await;
        d.add_event_listener("other", &cb).await;
        assert_eq!(d.loops.len(), 2);

        d.init().await;
        assert!(d.event_names().await.is_empty());
        assert!(d.listener_count("test").await.is_err());

        d.loops.close();
        tokio::time::timeout(WAIT, d.loops.wait())
            .await
            .expect("delivery loops should stop after init");
        d.loops.reopen();

        d.dispatch_event(Event::named("test")).await;
        assert_silent(&mut rx).await;

        // registering again after a reset works
        assert!(d.add_event_listener("test", &cb).await);
        d.dispatch_event(Event::named("test")).await;
        recv(&mut rx).await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_waits_for_running_listeners() {
        let d = Dispatcher::default();
        let done = Arc::new(AtomicUsize::new(0));
        let dn = Arc::clone(&done);
        let cb = Callback::from_fn("slow", move |_ev: Arc<Event>| {
            let dn = Arc::clone(&dn);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                dn.fetch_add(1, Ordering::SeqCst);
            }
        });
        d.add_event_listener("slow", &cb).await;
        d.dispatch_event(Event::named("slow")).await;

        d.shutdown().await.unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert!(d.event_names().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_reports_grace_exceeded() {
        let d = Dispatcher::new(DispatcherConfig {
            grace: Duration::from_millis(20),
            ..DispatcherConfig::default()
        });
        let cb = Callback::from_fn("stuck", |_ev: Arc<Event>| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
        });
        d.add_event_listener("stuck", &cb).await;
        d.dispatch_event(Event::named("stuck")).await;

        match d.shutdown().await {
            Err(DispatchError::GraceExceeded { grace, pending }) => {
                assert_eq!(grace, Duration::from_millis(20));
                assert!(pending >= 1);
            }
            other => panic!("expected GraceExceeded, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_registration_creates_one_chain() {
        let d = Arc::new(Dispatcher::default());
        let cb = Callback::from_sync("shared", |_: &Event| {});

        let mut handles = Vec::new();
        for _ in 0..8 {
            let d = Arc::clone(&d);
            let cb = cb.clone();
            handles.push(tokio::spawn(async move {
                d.add_event_listener("race", &cb).await
            }));
        }

        let mut added = 0;
        for h in handles {
            if h.await.unwrap() {
                added += 1;
            }
        }
        assert_eq!(added, 1);
        assert_eq!(d.event_names().await, vec!["race".to_string()]);
        assert_eq!(d.listener_count("race").await, Ok(1));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_larger_conduit_still_delivers_everything() {
        let d = Dispatcher::new(DispatcherConfig {
            conduit_capacity: 8,
            ..DispatcherConfig::default()
        });
        let hits = Arc::new(AtomicUsize::new(0));
        d.add_event_listener("buf", &counter(&hits)).await;
        for _ in 0..32 {
            d.dispatch_event(Event::named("buf")).await;
        }
        d.shutdown().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 32);
    }
}
