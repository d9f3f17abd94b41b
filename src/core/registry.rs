//! # Subscriber registry - copy-on-write map of live subscribers.
//!
//! The registry is the only shared mutable state of a broadcaster.
//!
//! ## Architecture
//! ```text
//! Mutex ─► Arc<HashMap<SubscriptionHandle, SubscriberRef>>
//!            ▲                         ▲
//!            │ insert/remove:          │ snapshot():
//!            │ Arc::make_mut + swap    │ Arc::clone under the lock
//! ```
//!
//! ## Rules
//! - Writers are mutually exclusive (one mutex).
//! - A snapshot is an `Arc` to an immutable map; a later write clones the map
//!   instead of touching a snapshot that is still held.
//! - The lock is held for bookkeeping only, never across a subscriber callback.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::handle::SubscriptionHandle;
use crate::subscribers::SubscriberRef;

/// Immutable point-in-time view of the registry.
pub(crate) type Snapshot = Arc<HashMap<SubscriptionHandle, SubscriberRef>>;

/// Copy-on-write registry of subscribers keyed by handle.
pub(crate) struct Registry {
    entries: Mutex<Snapshot>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Arc::new(HashMap::new())),
        }
    }

    /// Adds an entry; returns `false` if the handle was already present (left untouched).
    pub(crate) fn insert(&self, handle: SubscriptionHandle, sub: SubscriberRef) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(&handle) {
            return false;
        }
        Arc::make_mut(&mut entries).insert(handle, sub);
        true
    }

    /// Removes an entry, returning it if it was present.
    ///
    /// An absent handle leaves the map (and outstanding snapshots) untouched.
    pub(crate) fn remove(&self, handle: SubscriptionHandle) -> Option<SubscriberRef> {
        let mut entries = self.entries.lock();
        if !entries.contains_key(&handle) {
            return None;
        }
        Arc::make_mut(&mut entries).remove(&handle)
    }

    /// Removes every entry whose handle is in `handles`; returns how many were removed.
    ///
    /// Removed subscribers are dropped after the lock is released, so a `Drop`
    /// that calls back into the registry cannot deadlock.
    pub(crate) fn remove_all(&self, handles: &[SubscriptionHandle]) -> usize {
        let removed: Vec<SubscriberRef> = {
            let mut entries = self.entries.lock();
            if !handles.iter().any(|h| entries.contains_key(h)) {
                return 0;
            }
            let map = Arc::make_mut(&mut entries);
            handles.iter().filter_map(|h| map.remove(h)).collect()
        };
        removed.len()
    }

    /// Returns the current point-in-time view.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.entries.lock())
    }

    pub(crate) fn contains(&self, handle: SubscriptionHandle) -> bool {
        self.entries.lock().contains_key(&handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
