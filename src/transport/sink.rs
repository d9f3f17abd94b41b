//! # Channel-backed subscriber.
//!
//! [`EventSink`] forwards delivered events into a bounded tokio mpsc queue read
//! by one consumer. It is the bridge between the broadcaster's synchronous
//! callback and the consumer's asynchronous stream.
//!
//! ## Outcomes per delivery
//! - queued → `Ok`
//! - queue **full** → event dropped for this sink only, warning logged, `Ok`
//! - receiver **closed** → `Err(DeliveryError::Closed)`, so the broadcaster reaps the sink

use tokio::sync::mpsc;

use crate::error::DeliveryError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Subscriber that pushes events into an mpsc queue.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Event>,
}

impl EventSink {
    /// Wraps an existing sender.
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// Creates a sink and the receiver it feeds (capacity clamped to at least 1).
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl Subscribe for EventSink {
    fn deliver(&self, event: Event) -> Result<(), DeliveryError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(ev)) => {
                tracing::warn!(
                    event_type = ev.event_type(),
                    "listener queue full; event dropped for this listener"
                );
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(DeliveryError::Closed),
        }
    }

    fn name(&self) -> &'static str {
        "event-sink"
    }
}
