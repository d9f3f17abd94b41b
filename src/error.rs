//! Error types used by the broadcaster and the transport layer.
//!
//! This module defines two enums:
//!
//! - [`ChannelError`] — errors surfaced synchronously to a producer calling into
//!   an [`EventChannel`](crate::EventChannel).
//! - [`DeliveryError`] — errors raised by a single subscriber while an event is
//!   being delivered to it.
//!
//! A `DeliveryError` never reaches the producer: the broadcaster contains it,
//! removes the failing subscriber and moves on. Both types provide `as_label`
//! for logs/metrics.

use thiserror::Error;

/// # Errors returned to the producer side of a channel.
///
/// These map one-to-one onto the wire error codes a host transport reports
/// back to the caller (see [`ChannelError::code`]).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the request.
        message: String,
    },

    /// The method name is not served by this channel.
    #[error("method not implemented: {method}")]
    NotImplemented {
        /// The method that was requested.
        method: String,
    },

    /// The channel was detached from its engine and no longer accepts calls.
    #[error("channel is detached")]
    Detached,
}

impl ChannelError {
    /// Shorthand for the `eventType is required` rejection.
    pub(crate) fn missing_event_type() -> Self {
        ChannelError::InvalidArgument {
            message: "eventType is required".to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use isochan::ChannelError;
    ///
    /// let err = ChannelError::Detached;
    /// assert_eq!(err.as_label(), "channel_detached");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::InvalidArgument { .. } => "channel_invalid_argument",
            ChannelError::NotImplemented { .. } => "channel_not_implemented",
            ChannelError::Detached => "channel_detached",
        }
    }

    /// Returns the wire error code reported to the host.
    ///
    /// # Example
    /// ```
    /// use isochan::ChannelError;
    ///
    /// let err = ChannelError::InvalidArgument { message: "eventType is required".into() };
    /// assert_eq!(err.code(), "INVALID_ARGUMENT");
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            ChannelError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            ChannelError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            ChannelError::Detached => "DETACHED",
        }
    }

    /// Encodes the error as the `{code, message, details}` envelope hosts expect.
    pub fn to_wire(&self) -> serde_json::Value {
        let message = match self {
            ChannelError::InvalidArgument { message } => message.clone(),
            other => other.to_string(),
        };
        serde_json::json!({
            "code": self.code(),
            "message": message,
            "details": serde_json::Value::Null,
        })
    }
}

/// # Errors produced while delivering one event to one subscriber.
///
/// Any of these marks the subscriber as dead: the broadcaster removes it from
/// the registry and it receives nothing further.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The consumer behind this subscriber has gone away.
    #[error("subscriber closed")]
    Closed,

    /// The subscriber refused the event.
    #[error("delivery rejected: {reason}")]
    Rejected {
        /// Subscriber-provided reason.
        reason: String,
    },

    /// The subscriber panicked while handling the event.
    #[error("subscriber panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl DeliveryError {
    /// Convenience constructor for [`DeliveryError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        DeliveryError::Rejected {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use isochan::DeliveryError;
    ///
    /// assert_eq!(DeliveryError::Closed.as_label(), "delivery_closed");
    /// assert_eq!(DeliveryError::rejected("nope").as_label(), "delivery_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Closed => "delivery_closed",
            DeliveryError::Rejected { .. } => "delivery_rejected",
            DeliveryError::Panicked { .. } => "delivery_panicked",
        }
    }
}
