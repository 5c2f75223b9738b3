//! Error types used by the dispatcher.
//!
//! Delivery itself is best-effort and never fails: unknown event names,
//! unknown callbacks and duplicate registrations are silent no-ops.
//! [`DispatchError`] only covers the operations that report back to the
//! caller, such as querying a chain that was never created or a shutdown
//! that outlived its grace period.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the dispatcher.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No listener chain exists for the event name.
    #[error("event name '{name}' not found")]
    EventNotFound {
        /// The event name that was looked up.
        name: String,
    },

    /// Shutdown grace period was exceeded while delivery loops or listener
    /// invocations were still running.
    #[error("shutdown timeout {grace:?} exceeded; {pending} task(s) still running")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of tracked tasks that had not finished.
        pending: usize,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventchain::DispatchError;
    ///
    /// let err = DispatchError::EventNotFound { name: "test".into() };
    /// assert_eq!(err.as_label(), "event_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::EventNotFound { .. } => "event_not_found",
            DispatchError::GraceExceeded { .. } => "dispatch_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::EventNotFound { name } => format!("no listeners for event={name:?}"),
            DispatchError::GraceExceeded { grace, pending } => {
                format!("grace exceeded after {grace:?}; pending tasks={pending}")
            }
        }
    }
}
