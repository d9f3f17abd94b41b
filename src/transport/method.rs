//! Method-call envelope and channel names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the method channel producers call into.
pub const EMIT_CHANNEL: &str = "inter_isolate_event/emit";

/// Name of the event channel consumers listen on.
pub const BROADCAST_CHANNEL: &str = "inter_isolate_event/broadcast";

/// The only method served on [`EMIT_CHANNEL`].
pub const EMIT_EVENT: &str = "emitEvent";

/// A decoded method invocation from the host.
///
/// ```text
/// {"method": "emitEvent", "arguments": {"eventType": "ping", "payload": 42}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name.
    pub method: String,
    /// Method arguments (`null` when absent).
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    /// Creates a call with arbitrary arguments.
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Builds an `emitEvent` call.
    pub fn emit_event(event_type: impl Into<String>, payload: Value) -> Self {
        Self::new(
            EMIT_EVENT,
            serde_json::json!({
                "eventType": event_type.into(),
                "payload": payload,
            }),
        )
    }
}
