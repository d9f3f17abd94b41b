//! Subscription handles.

use std::fmt;

/// Opaque identifier returned by [`Broadcaster::subscribe`](crate::Broadcaster::subscribe).
///
/// Allocated from a per-broadcaster counter: unique, comparable, never reused
/// by the broadcaster that issued it, and unrelated to the subscriber's own identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    #[inline]
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value (for logs and host-side bookkeeping).
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}
