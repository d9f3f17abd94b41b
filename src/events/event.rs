//! # Broadcast event.
//!
//! An [`Event`] is a named notification carrying an opaque JSON payload.
//! It is immutable once built: fields are private and only exposed through
//! accessors. The broadcaster hands every subscriber its **own** clone, so a
//! subscriber that takes the payload apart cannot affect what others see.
//!
//! ## Wire shape
//! ```text
//! {"eventType": "<non-empty string>", "payload": <any JSON | null>}
//! ```
//! Both keys are always present when serialized; a missing payload becomes `null`.
//!
//! ## Example
//! ```rust
//! use isochan::Event;
//! use serde_json::json;
//!
//! let ev = Event::new("ping", json!(42)).unwrap();
//! assert_eq!(ev.event_type(), "ping");
//! assert_eq!(ev.payload(), &json!(42));
//! assert_eq!(serde_json::to_value(&ev).unwrap(), json!({"eventType": "ping", "payload": 42}));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChannelError;

/// A named notification with an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", rename_all = "camelCase")]
pub struct Event {
    event_type: String,
    payload: Value,
}

/// Unvalidated wire form used during deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    event_type: Option<String>,
    #[serde(default)]
    payload: Value,
}

impl TryFrom<RawEvent> for Event {
    type Error = ChannelError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Event::new(raw.event_type.unwrap_or_default(), raw.payload)
    }
}

impl Event {
    /// Builds an event, rejecting an empty event type.
    ///
    /// Pass [`Value::Null`] when there is no payload.
    pub fn new(event_type: impl Into<String>, payload: Value) -> Result<Self, ChannelError> {
        let event_type = event_type.into();
        if event_type.is_empty() {
            return Err(ChannelError::missing_event_type());
        }
        Ok(Self {
            event_type,
            payload,
        })
    }

    /// Builds an event without a payload.
    pub fn bare(event_type: impl Into<String>) -> Result<Self, ChannelError> {
        Self::new(event_type, Value::Null)
    }

    /// Event type identifier.
    #[inline]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Payload (`Null` when none was given).
    #[inline]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// True if the event carries a non-null payload.
    #[inline]
    pub fn has_payload(&self) -> bool {
        !self.payload.is_null()
    }

    /// Consumes the event, returning its parts.
    ///
    /// Subscribers receive owned events, so taking the payload out is free
    /// and invisible to other subscribers.
    pub fn into_parts(self) -> (String, Value) {
        (self.event_type, self.payload)
    }
}
