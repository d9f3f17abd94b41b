//! # isochan
//!
//! **isochan** lets independently running execution contexts (engine instances,
//! isolates, threads in one host process) exchange named notifications without
//! shared memory regions or references to each other.
//!
//! One side emits an event with an opaque JSON payload; every side listening at
//! that moment receives its own copy.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ EventChannel │   │ EventChannel │   │ EventChannel │
//!     │  (engine #1) │   │  (engine #2) │   │  (engine #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!   emitEvent│          on_listen│          on_listen│
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Broadcaster (one per process, shared via Arc)                    │
//! │  - Registry (copy-on-write map: SubscriptionHandle → Subscribe)   │
//! │  - publish: snapshot → deliver to each → reap failures            │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     EventSink          EventSink          custom Subscribe
//!        │ mpsc             │ mpsc
//!        ▼                  ▼
//!     EventStream        EventStream
//! ```
//!
//! ### Guarantees
//! - At most one delivery attempt per subscriber registered when `publish` starts.
//! - A subscriber whose delivery fails (error or panic) is removed and never
//!   called again; the others still receive the event.
//! - `unsubscribe` is idempotent; unknown handles are ignored.
//! - No ordering across subscribers, no persistence, no retries, no backpressure.
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that logs every event _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use isochan::{Broadcaster, EventChannel};
//! use serde_json::json;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let broadcaster = Arc::new(Broadcaster::default());
//!
//!     // One channel per engine; all share the broadcaster.
//!     let ui = EventChannel::attach(Arc::clone(&broadcaster));
//!     let worker = EventChannel::attach(Arc::clone(&broadcaster));
//!
//!     let mut events = ui.on_listen()?;
//!     worker.emit("progress", json!({"done": 3, "total": 10}))?;
//!
//!     if let Some(ev) = events.next().await {
//!         println!("{} {}", ev.event_type(), ev.payload());
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod subscribers;
mod transport;

// ---- Public re-exports ----

pub use crate::core::{Broadcaster, Config, DeliveryMode, SubscriptionHandle};
pub use error::{ChannelError, DeliveryError};
pub use events::Event;
pub use subscribers::{Subscribe, SubscriberFn, SubscriberRef};
pub use transport::{
    EventChannel, EventSink, EventStream, MethodCall, BROADCAST_CHANNEL, EMIT_CHANNEL, EMIT_EVENT,
};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
