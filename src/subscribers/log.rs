//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] emits one `tracing` record per delivered event.
//!
//! ## Output format
//! ```text
//! INFO isochan: event delivered event_type="ping" payload=42
//! INFO isochan: event delivered event_type="tick" payload=null
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use isochan::{Broadcaster, LogWriter};
//! let broadcaster = Broadcaster::default();
//! broadcaster.subscribe(Arc::new(LogWriter));
//! ```

use crate::error::DeliveryError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Logging subscriber.
///
/// Enabled via the `logging` feature. Never fails, so it is never reaped.
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured export.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl Subscribe for LogWriter {
    fn deliver(&self, event: Event) -> Result<(), DeliveryError> {
        tracing::info!(
            target: "isochan",
            event_type = event.event_type(),
            payload = %event.payload(),
            "event delivered"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
