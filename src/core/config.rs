//! # Dispatcher configuration.
//!
//! Provides [`DispatcherConfig`] centralized settings for a [`Dispatcher`](crate::Dispatcher).
//!
//! The process-wide instance returned by
//! [`Dispatcher::shared`](crate::Dispatcher::shared) always uses
//! `DispatcherConfig::default()`; build a dedicated instance with
//! [`Dispatcher::new`](crate::Dispatcher::new) to override it.
//!
//! ## Sentinel values
//! - `conduit_capacity = 0` → clamped to 1 (single-slot handoff)

use std::time::Duration;

/// Configuration for a dispatcher.
///
/// ## Field semantics
/// - `conduit_capacity`: Slots per delivery conduit (min 1; `1` = handoff)
/// - `grace`: Maximum wait for loops and listener invocations on [`shutdown`](crate::Dispatcher::shutdown)
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Number of events a delivery conduit can hold before `dispatch_event`
    /// waits for the delivery loop to take one.
    ///
    /// - `1` = single-slot handoff: at most one pending event per listener
    /// - `n > 1` = short burst buffer per listener
    pub conduit_capacity: usize,

    /// Maximum time [`Dispatcher::shutdown`](crate::Dispatcher::shutdown)
    /// waits for delivery loops and in-flight listener invocations.
    ///
    /// If exceeded, shutdown returns `DispatchError::GraceExceeded`.
    pub grace: Duration,
}

impl DispatcherConfig {
    /// Returns the conduit capacity clamped to a minimum of 1.
    #[inline]
    pub fn conduit_capacity_clamped(&self) -> usize {
        self.conduit_capacity.max(1)
    }
}

impl Default for DispatcherConfig {
    /// Default configuration:
    ///
    /// - `conduit_capacity = 1` (single-slot handoff)
    /// - `grace = 5s`
    fn default() -> Self {
        Self {
            conduit_capacity: 1,
            grace: Duration::from_secs(5),
        }
    }
}
