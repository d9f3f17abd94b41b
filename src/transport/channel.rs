//! # Per-engine channel over the shared broadcaster.
//!
//! An [`EventChannel`] is created when an engine/isolate attaches and plays
//! both host roles for it:
//! - **emit** (`inter_isolate_event/emit`): decodes `emitEvent` calls and publishes;
//! - **broadcast** (`inter_isolate_event/broadcast`): opens and cancels listener streams.
//!
//! ## Lifecycle
//! ```text
//! attach(broadcaster) ─► handle_method_call / emit / on_listen / on_cancel ─► detach()
//!                                                                               │
//!                                    unsubscribe every listener this channel opened
//! ```
//! Detaching (or dropping the channel) leaves the broadcaster and other channels untouched.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use isochan::{Broadcaster, EventChannel, MethodCall};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), isochan::ChannelError> {
//! let broadcaster = Arc::new(Broadcaster::default());
//! let producer = EventChannel::attach(Arc::clone(&broadcaster));
//! let consumer = EventChannel::attach(Arc::clone(&broadcaster));
//!
//! let mut stream = consumer.on_listen()?;
//! producer.handle_method_call(&MethodCall::emit_event("ping", json!(42)))?;
//!
//! let ev = stream.recv().await.unwrap();
//! assert_eq!(ev.event_type(), "ping");
//! assert_eq!(ev.payload(), &json!(42));
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::method::{MethodCall, EMIT_EVENT};
use super::sink::EventSink;
use super::stream::EventStream;
use crate::core::{Broadcaster, SubscriptionHandle};
use crate::error::ChannelError;
use crate::events::Event;

/// Host-facing adapter for one attached engine.
pub struct EventChannel {
    broadcaster: Arc<Broadcaster>,
    listeners: Arc<Mutex<HashSet<SubscriptionHandle>>>,
    attached: AtomicBool,
}

impl EventChannel {
    /// Attaches a new channel to `broadcaster`.
    pub fn attach(broadcaster: Arc<Broadcaster>) -> Self {
        tracing::debug!(subscribers = broadcaster.len(), "channel attached");
        Self {
            broadcaster,
            listeners: Arc::new(Mutex::new(HashSet::new())),
            attached: AtomicBool::new(true),
        }
    }

    /// Attaches a new channel to the process-wide broadcaster.
    pub fn attach_shared() -> Self {
        Self::attach(Broadcaster::shared())
    }

    /// Detaches the channel and unsubscribes every listener it opened.
    ///
    /// Their streams end once already-queued events are drained. Calling it
    /// again is a no-op.
    pub fn detach(&self) {
        if !self.attached.swap(false, Ordering::SeqCst) {
            return;
        }
        let handles: Vec<SubscriptionHandle> = self.listeners.lock().drain().collect();
        let removed = self.broadcaster.unsubscribe_all(&handles);
        tracing::debug!(listeners = handles.len(), removed, "channel detached");
    }

    /// True until [`detach`](Self::detach) is called.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Broadcaster this channel publishes to.
    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// Dispatches a method call arriving on the emit channel.
    ///
    /// ### Errors
    /// - `emitEvent` without a non-empty string `eventType` → [`ChannelError::InvalidArgument`]
    /// - any other method → [`ChannelError::NotImplemented`]
    /// - channel detached → [`ChannelError::Detached`]
    pub fn handle_method_call(&self, call: &MethodCall) -> Result<(), ChannelError> {
        self.ensure_attached()?;
        if call.method != EMIT_EVENT {
            return Err(ChannelError::NotImplemented {
                method: call.method.clone(),
            });
        }
        let event = decode_emit_args(&call.arguments)?;
        self.broadcaster.publish(&event);
        Ok(())
    }

    /// Publishes an event built from its parts (same validation as `emitEvent`).
    pub fn emit(&self, event_type: &str, payload: Value) -> Result<(), ChannelError> {
        self.ensure_attached()?;
        let event = Event::new(event_type, payload)?;
        self.broadcaster.publish(&event);
        Ok(())
    }

    /// Opens a listener stream on the broadcast channel.
    pub fn on_listen(&self) -> Result<EventStream, ChannelError> {
        let mut listeners = self.listeners.lock();
        self.ensure_attached()?;

        let (sink, rx) = EventSink::channel(self.broadcaster.config().stream_capacity);
        let handle = self.broadcaster.subscribe(Arc::new(sink));
        listeners.insert(handle);
        drop(listeners);

        Ok(EventStream::new(
            rx,
            handle,
            Arc::clone(&self.broadcaster),
            Arc::clone(&self.listeners),
        ))
    }

    /// Cancels a listener opened by this channel.
    ///
    /// Returns `true` if the subscription was still active. Unknown handles are ignored.
    pub fn on_cancel(&self, handle: SubscriptionHandle) -> bool {
        if !self.listeners.lock().remove(&handle) {
            return false;
        }
        self.broadcaster.unsubscribe(handle)
    }

    /// Number of listeners opened by this channel and not yet cancelled.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn ensure_attached(&self) -> Result<(), ChannelError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(ChannelError::Detached)
        }
    }
}

impl Drop for EventChannel {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("attached", &self.is_attached())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Decodes `emitEvent` arguments; a missing payload becomes `null`.
fn decode_emit_args(arguments: &Value) -> Result<Event, ChannelError> {
    let event_type = arguments
        .get("eventType")
        .and_then(Value::as_str)
        .ok_or_else(ChannelError::missing_event_type)?;
    let payload = arguments.get("payload").cloned().unwrap_or(Value::Null);
    Event::new(event_type, payload)
}
