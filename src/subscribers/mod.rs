//! # Subscribers: delivery targets for broadcast events.
//!
//! This module provides the [`Subscribe`] trait and the building blocks around it.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   producer ── publish(&Event) ──► Broadcaster ──► snapshot of registry
//!                                                     │
//!                                                     ├──► Subscribe::deliver(Event)  (owned clone)
//!                                                     │         │
//!                                                     │    ┌────┴─────┬────────────┬──────────┐
//!                                                     │    ▼          ▼            ▼          ▼
//!                                                     │  EventSink  SubscriberFn  LogWriter  custom
//!                                                     │
//!                                                     └──► Err / panic → subscriber reaped
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use isochan::{DeliveryError, Event, Subscribe};
//!
//! struct Audit;
//!
//! impl Subscribe for Audit {
//!     fn deliver(&self, event: Event) -> Result<(), DeliveryError> {
//!         if event.event_type() == "shutdown" {
//!             return Err(DeliveryError::rejected("audit closed"));
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_fn;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::{Subscribe, SubscriberRef};
pub use subscriber_fn::SubscriberFn;
