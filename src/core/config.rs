//! # Broadcaster configuration.
//!
//! Provides [`Config`] settings shared by a broadcaster and every
//! [`EventChannel`](crate::EventChannel) attached to it.
//!
//! ## Sentinel values
//! - `stream_capacity = 0` → one slot (clamped by [`EventSink::channel`](crate::EventSink::channel))

/// How `publish` runs subscriber callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Callbacks run sequentially on the publisher's thread.
    ///
    /// `publish` returns after every attempt finished and every failing
    /// subscriber has been removed.
    #[default]
    Inline,

    /// Each delivery attempt runs on tokio's blocking pool (`spawn_blocking`).
    ///
    /// `publish` returns once all attempts are scheduled; failing subscribers
    /// are removed as their attempts resolve. A slow `deliver` occupies a
    /// blocking-pool thread, not a runtime worker. Falls back to
    /// [`DeliveryMode::Inline`] when called outside a tokio runtime.
    Detached,
}

/// Configuration for a [`Broadcaster`](crate::Broadcaster).
///
/// ## Field semantics
/// - `delivery`: callback scheduling model (see [`DeliveryMode`])
/// - `stream_capacity`: per-listener queue size for streams opened by channels (`0` acts as 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Callback scheduling model.
    pub delivery: DeliveryMode,

    /// Capacity of each listener's mpsc queue.
    ///
    /// A listener that falls this far behind drops new events until it catches
    /// up; it is not removed for being slow.
    pub stream_capacity: usize,
}

impl Config {
    /// Returns a copy with the given delivery mode.
    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `delivery = DeliveryMode::Inline`
    /// - `stream_capacity = 1024`
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::Inline,
            stream_capacity: 1024,
        }
    }
}
