//! # Emit / Listen Example
//!
//! Shows two "engines" sharing one broadcaster:
//! - the UI engine listens on its channel,
//! - the worker engine emits progress events through `emitEvent` calls,
//! - a custom subscriber counts events,
//! - a flaky subscriber fails once and is reaped.
//!
//! ## Run
//! ```bash
//! cargo run --example emit_listen
//! ```

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use isochan::{
    Broadcaster, DeliveryError, Event, EventChannel, MethodCall, Subscribe, SubscriberFn,
};
use serde_json::json;

struct CountingSubscriber {
    seen: AtomicU64,
}

impl Subscribe for CountingSubscriber {
    fn deliver(&self, _event: Event) -> Result<(), DeliveryError> {
        self.seen.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "counter"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let broadcaster = Arc::new(Broadcaster::default());

    let ui = EventChannel::attach(Arc::clone(&broadcaster));
    let worker = EventChannel::attach(Arc::clone(&broadcaster));

    let counter = Arc::new(CountingSubscriber {
        seen: AtomicU64::new(0),
    });
    broadcaster.subscribe(counter.clone());
    let flaky = broadcaster.subscribe(SubscriberFn::arc("flaky", |_| {
        Err(DeliveryError::rejected("consumer went away"))
    }));

    let mut events = ui.on_listen()?;
    let listener = tokio::spawn(async move {
        while let Some(ev) = events.recv().await {
            println!("[ui] {} {}", ev.event_type(), ev.payload());
            if ev.event_type() == "done" {
                break;
            }
        }
    });

    for step in 1..=3 {
        worker.handle_method_call(&MethodCall::emit_event("progress", json!({ "step": step })))?;
    }
    worker.emit("done", serde_json::Value::Null)?;

    if let Err(err) = worker.handle_method_call(&MethodCall::new("emitEvent", json!({}))) {
        println!("[worker] rejected: {}", err.to_wire());
    }

    listener.await?;

    println!();
    println!("Summary:");
    println!(" ├─► Counted:       {}", counter.seen.load(Ordering::Relaxed));
    println!(" ├─► Flaky active:  {}", broadcaster.contains(flaky));
    println!(" └─► Subscribers:   {}", broadcaster.len());
    Ok(())
}
