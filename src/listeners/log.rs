//! # Logging listener for debugging and demos.
//!
//! [`LogListener`] writes every received event through `tracing` at `info`
//! level. Register it for any event name to watch traffic on that name.
//!
//! ## Output format (with `tracing_subscriber::fmt`)
//! ```text
//! INFO eventchain::listeners::log: event received event="user.created" seq=3 params=1
//! ```
//!
//! ## Example
//! ```no_run
//! # use eventchain::{Callback, Dispatcher, LogListener};
//! # async fn demo() {
//! let cb = Callback::new(LogListener);
//! Dispatcher::shared().add_event_listener("user.created", &cb).await;
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::events::Event;
use crate::listeners::Listen;

/// Structured logging listener.
///
/// Enabled via the `logging` feature. Not intended for production use -
/// implement a custom [`Listen`] for audit trails or metrics collection.
pub struct LogListener;

#[async_trait]
impl Listen for LogListener {
    async fn on_event(&self, e: Arc<Event>) {
        tracing::info!(
            event = %e.name(),
            seq = e.seq(),
            params = e.payload().len(),
            "event received"
        );
        tracing::debug!(event = %e.name(), payload = ?e.payload(), "event payload");
    }

    fn name(&self) -> &str {
        "log"
    }
}
