//! # Basic dispatcher example
//!
//! Registers two listeners on one event name, dispatches a few events,
//! removes one listener and shuts down.
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example basic --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use eventchain::{Callback, Dispatcher, Event, LogListener};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let dispatcher = Dispatcher::shared();
    let total = Arc::new(AtomicU64::new(0));

    let t = Arc::clone(&total);
    let summer = Callback::from_sync("summer", move |ev: &Event| {
        if let Some(amount) = ev.get("amount").and_then(|v| v.as_u64()) {
            t.fetch_add(amount, Ordering::Relaxed);
        }
    });
    let logger = Callback::new(LogListener);

    dispatcher.add_event_listener("order.paid", &summer).await;
    dispatcher.add_event_listener("order.paid", &logger).await;

    for (id, amount) in [(1, 40), (2, 15), (3, 99)] {
        dispatcher
            .dispatch_event(
                Event::named("order.paid")
                    .with_param("order", id)
                    .with_param("amount", amount),
            )
            .await;
    }

    dispatcher.remove_event_listener("order.paid", &logger).await;
    dispatcher
        .dispatch_event(Event::named("order.paid").with_param("order", 4).with_param("amount", 1))
        .await;

    // nobody listens here; silently dropped
    dispatcher.dispatch_event(Event::named("order.refunded")).await;

    dispatcher.shutdown().await?;
    println!();
    println!("Summary:");
    println!(" └─► Total paid: {}", total.load(Ordering::Relaxed));
    Ok(())
}
