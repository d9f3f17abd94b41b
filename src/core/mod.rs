//! Broadcaster core: registry, handles, configuration and fan-out.
//!
//! The public API from this module is [`Broadcaster`] with its
//! [`SubscriptionHandle`], [`Config`] and [`DeliveryMode`].
//!
//! Internal modules:
//! - [`broadcaster`]: subscribe/unsubscribe/publish, failure containment, process-wide instance;
//! - [`registry`]: copy-on-write subscriber map with point-in-time snapshots;
//! - [`handle`]: non-reusable subscription identifiers;
//! - [`config`]: delivery model and stream sizing.

mod broadcaster;
mod config;
mod handle;
mod registry;

pub use broadcaster::Broadcaster;
pub use config::{Config, DeliveryMode};
pub use handle::SubscriptionHandle;
