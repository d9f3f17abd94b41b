//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the single-method capability the broadcaster stores
//! in its registry and invokes during fan-out.
//!
//! ## Rules
//! - `deliver` runs **outside** any broadcaster lock; it may call back into
//!   `subscribe`, `unsubscribe` or `publish`.
//! - Returning `Err` or panicking counts as a delivery failure: the subscriber is
//!   removed from the registry and never called again.
//! - Other subscribers are unaffected by one subscriber's failure.
//! - No cross-subscriber ordering is promised.
//!
//! ## Example
//! ```rust
//! use isochan::{DeliveryError, Event, Subscribe};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl Subscribe for Counter {
//!     fn deliver(&self, _event: Event) -> Result<(), DeliveryError> {
//!         self.0.fetch_add(1, Ordering::Relaxed);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "counter" }
//! }
//! ```

use std::sync::Arc;

use crate::error::DeliveryError;
use crate::events::Event;

/// Shared handle to a subscriber (`Arc<dyn Subscribe>`).
pub type SubscriberRef = Arc<dyn Subscribe>;

/// Delivery target registered with a [`Broadcaster`](crate::Broadcaster).
///
/// ### Implementation requirements
/// - Return quickly; in inline mode the publisher waits for every subscriber.
/// - Signal a dead consumer with `Err` so the broadcaster can reap it.
pub trait Subscribe: Send + Sync + 'static {
    /// Delivers one event.
    ///
    /// The event is an owned copy private to this subscriber.
    fn deliver(&self, event: Event) -> Result<(), DeliveryError>;

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
