//! # Consumer-side event stream.
//!
//! [`EventStream`] is what a listening context holds. It yields events in the
//! order they reached this listener and ends once its subscription is gone
//! (cancelled, detached, or reaped).
//!
//! Dropping the stream unsubscribes it, so a consumer that simply goes away
//! stops receiving events without waiting for a failed delivery.

use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::core::{Broadcaster, SubscriptionHandle};
use crate::events::Event;

/// Async stream of events for one listener.
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
    handle: SubscriptionHandle,
    broadcaster: Arc<Broadcaster>,
    listeners: Arc<Mutex<HashSet<SubscriptionHandle>>>,
}

impl EventStream {
    pub(crate) fn new(
        rx: mpsc::Receiver<Event>,
        handle: SubscriptionHandle,
        broadcaster: Arc<Broadcaster>,
        listeners: Arc<Mutex<HashSet<SubscriptionHandle>>>,
    ) -> Self {
        Self {
            rx,
            handle,
            broadcaster,
            listeners,
        }
    }

    /// Subscription handle backing this stream.
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle
    }

    /// Waits for the next event; `None` once the subscription is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns a queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Stops listening. Same as dropping the stream.
    pub fn cancel(self) {}
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.listeners.lock().remove(&self.handle);
        self.broadcaster.unsubscribe(self.handle);
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
