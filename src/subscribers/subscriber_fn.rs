//! # Function-backed subscriber (`SubscriberFn`)
//!
//! [`SubscriberFn`] wraps a closure `F: Fn(Event) -> Result<(), DeliveryError>`
//! so anonymous callbacks can be registered without declaring a type.
//! Two `SubscriberFn`s built from the same closure are still two subscribers:
//! identity comes from the handle returned by `subscribe`, never from the callback.
//!
//! ## Example
//! ```rust
//! use isochan::{Broadcaster, Event, SubscriberFn, SubscriberRef};
//!
//! let sub: SubscriberRef = SubscriberFn::arc("printer", |ev: Event| {
//!     println!("{}", ev.event_type());
//!     Ok(())
//! });
//! assert_eq!(sub.name(), "printer");
//!
//! let broadcaster = Broadcaster::default();
//! let handle = broadcaster.subscribe(sub);
//! assert!(broadcaster.contains(handle));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::DeliveryError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Closure-backed subscriber.
pub struct SubscriberFn<F> {
    name: &'static str,
    f: F,
}

impl<F> SubscriberFn<F>
where
    F: Fn(Event) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`SubscriberFn::arc`] when you immediately need a [`SubscriberRef`](crate::SubscriberRef).
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> fmt::Debug for SubscriberFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Subscribe for SubscriberFn<F>
where
    F: Fn(Event) -> Result<(), DeliveryError> + Send + Sync + 'static,
{
    fn deliver(&self, event: Event) -> Result<(), DeliveryError> {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
