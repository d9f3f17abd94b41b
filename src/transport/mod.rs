//! # Transport adapter: host-facing surface over a shared [`Broadcaster`](crate::Broadcaster).
//!
//! Each engine/isolate attaches its own [`EventChannel`]; all channels share one
//! broadcaster, which is how contexts without shared references reach each other.
//!
//! ## Architecture
//! ```text
//! producer context                                 consumer context
//!   MethodCall("emitEvent") ─► EventChannel A        EventChannel B ─► on_listen()
//!                                   │                     │               │
//!                                   ▼                     │               ▼
//!                        Broadcaster::publish ────────────┼──► EventSink ─► [mpsc] ─► EventStream
//!                                                         │                              │
//!                                                         └──◄── on_cancel / drop ───────┘
//! ```
//!
//! ## Rules
//! - Explicit cancellation is the primary removal path: `on_cancel`, dropping the
//!   [`EventStream`], or detaching the channel all unsubscribe.
//! - A sink whose stream is gone fails its next delivery and is reaped.
//! - A full listener queue drops the event for that listener only.

mod channel;
mod method;
mod sink;
mod stream;

pub use channel::EventChannel;
pub use method::{MethodCall, BROADCAST_CHANNEL, EMIT_CHANNEL, EMIT_EVENT};
pub use sink::EventSink;
pub use stream::EventStream;
