//! Broadcast events: the value that travels from one producer to every listener.
//!
//! ## Contents
//! - [`Event`] event type identifier plus opaque JSON payload
//!
//! ## Quick reference
//! - **Producers**: [`EventChannel::emit`](crate::EventChannel::emit),
//!   [`EventChannel::handle_method_call`](crate::EventChannel::handle_method_call),
//!   or [`Broadcaster::publish`](crate::Broadcaster::publish) directly.
//! - **Consumers**: any [`Subscribe`](crate::Subscribe) implementation, usually an
//!   [`EventStream`](crate::EventStream) opened through a channel.

mod event;

pub use event::Event;
