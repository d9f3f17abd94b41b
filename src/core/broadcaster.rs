//! # Broadcaster: registry ownership, fan-out and failure containment.
//!
//! The [`Broadcaster`] owns the subscriber [`Registry`] and implements
//! `subscribe` / `unsubscribe` / `publish`, all callable concurrently from any thread.
//!
//! ## Architecture
//! ```text
//! publish(&Event)
//!     │
//!     ├─► registry.snapshot()            (Arc clone under a short lock)
//!     │
//!     ├─► for each (handle, sub) in snapshot:
//!     │       event.clone() ──► sub.deliver(event)     (no lock held)
//!     │                            ├─ Ok      → next
//!     │                            ├─ Err     → registry.remove(handle) → next
//!     │                            └─ panic   → caught → registry.remove(handle) → next
//!     │
//!     └─► return (never fails as a whole)
//! ```
//!
//! ## Rules
//! - At most one delivery attempt per subscriber present in the snapshot.
//! - Subscribers added after the snapshot miss this event; subscribers removed
//!   after it may still get this one attempt.
//! - A reaped subscriber is never called again; its handle stays dead.
//! - Inline mode blocks on each callback in turn; detached mode only schedules
//!   each attempt on tokio's blocking pool.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use isochan::{Broadcaster, Event, SubscriberFn};
//! use serde_json::json;
//!
//! let broadcaster = Arc::new(Broadcaster::default());
//! let h1 = broadcaster.subscribe(SubscriberFn::arc("a", |_ev| Ok(())));
//! let _h2 = broadcaster.subscribe(SubscriberFn::arc("b", |_ev| Ok(())));
//!
//! broadcaster.publish(&Event::new("ping", json!(42)).unwrap());
//! assert!(broadcaster.unsubscribe(h1));
//! assert!(!broadcaster.unsubscribe(h1)); // idempotent
//! assert_eq!(broadcaster.len(), 1);
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use super::config::{Config, DeliveryMode};
use super::handle::SubscriptionHandle;
use super::registry::{Registry, Snapshot};
use crate::error::DeliveryError;
use crate::events::Event;
use crate::subscribers::{Subscribe, SubscriberRef};

/// Process-wide instance handed out by [`Broadcaster::shared`].
static SHARED: OnceLock<Arc<Broadcaster>> = OnceLock::new();

/// Concurrent fan-out hub for [`Event`]s.
///
/// Construct one per process and share it via `Arc` with every
/// [`EventChannel`](crate::EventChannel); tests construct their own.
pub struct Broadcaster {
    registry: Arc<Registry>,
    next_handle: AtomicU64,
    config: Config,
}

impl Broadcaster {
    /// Creates an empty broadcaster.
    pub fn new(config: Config) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            next_handle: AtomicU64::new(1),
            config,
        }
    }

    /// Returns the lazily created process-wide broadcaster.
    ///
    /// Every call returns the same instance; it lives until process exit.
    /// Prefer passing an explicitly constructed `Arc<Broadcaster>` where you can.
    pub fn shared() -> Arc<Broadcaster> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Broadcaster::default())))
    }

    /// Configuration this broadcaster was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers a subscriber and returns its fresh handle.
    pub fn subscribe(&self, sub: SubscriberRef) -> SubscriptionHandle {
        let handle = SubscriptionHandle::from_raw(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let name = sub.name();
        self.registry.insert(handle, sub);
        tracing::debug!(%handle, subscriber = name, "subscribed");
        handle
    }

    /// Removes a subscriber.
    ///
    /// Returns `true` if this call removed it. An unknown or already removed
    /// handle is a silent no-op returning `false`.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        match self.registry.remove(handle) {
            Some(sub) => {
                tracing::debug!(%handle, subscriber = sub.name(), "unsubscribed");
                true
            }
            None => false,
        }
    }

    /// Removes several subscribers under one registry write; returns how many were present.
    pub fn unsubscribe_all(&self, handles: &[SubscriptionHandle]) -> usize {
        let removed = self.registry.remove_all(handles);
        if removed > 0 {
            tracing::debug!(removed, "unsubscribed batch");
        }
        removed
    }

    /// Delivers `event` to every subscriber registered at call entry.
    ///
    /// Failing subscribers are removed; delivery to the rest continues.
    /// The given event is never modified; each subscriber gets its own clone.
    pub fn publish(&self, event: &Event) {
        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            tracing::trace!(event_type = event.event_type(), "no subscribers; event dropped");
            return;
        }

        tracing::debug!(
            event_type = event.event_type(),
            subscribers = snapshot.len(),
            "publishing"
        );

        match self.config.delivery {
            DeliveryMode::Inline => self.fan_out_inline(&snapshot, event),
            DeliveryMode::Detached => match tokio::runtime::Handle::try_current() {
                Ok(rt) => self.fan_out_detached(&rt, &snapshot, event),
                Err(_) => {
                    tracing::warn!(
                        event_type = event.event_type(),
                        "detached delivery requested outside a tokio runtime; delivering inline"
                    );
                    self.fan_out_inline(&snapshot, event);
                }
            },
        }
    }

    /// True if `handle` is currently registered.
    pub fn contains(&self, handle: SubscriptionHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fan_out_inline(&self, snapshot: &Snapshot, event: &Event) {
        for (handle, sub) in snapshot.iter() {
            deliver_one(&self.registry, *handle, &**sub, event.clone());
        }
    }

    fn fan_out_detached(&self, rt: &tokio::runtime::Handle, snapshot: &Snapshot, event: &Event) {
        for (handle, sub) in snapshot.iter() {
            let registry = Arc::clone(&self.registry);
            let sub = Arc::clone(sub);
            let handle = *handle;
            let event = event.clone();
            rt.spawn_blocking(move || {
                deliver_one(&registry, handle, &*sub, event);
            });
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Broadcaster")
            .field("subscribers", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Runs one delivery attempt and reaps the subscriber if it fails.
fn deliver_one(registry: &Registry, handle: SubscriptionHandle, sub: &dyn Subscribe, event: Event) {
    let Err(err) = attempt(sub, event) else {
        return;
    };
    let removed = registry.remove(handle).is_some();
    tracing::warn!(
        %handle,
        subscriber = sub.name(),
        reason = err.as_label(),
        error = %err,
        removed,
        "delivery failed; subscriber reaped"
    );
}

/// Invokes `deliver`, turning a panic into [`DeliveryError::Panicked`].
fn attempt(sub: &dyn Subscribe, event: Event) -> Result<(), DeliveryError> {
    match panic::catch_unwind(AssertUnwindSafe(|| sub.deliver(event))) {
        Ok(res) => res,
        Err(payload) => Err(DeliveryError::Panicked {
            info: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::SubscriberFn;
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Event>>,
    }

    impl Recorder {
        fn payloads(&self) -> Vec<Value> {
            self.seen.lock().iter().map(|e| e.payload().clone()).collect()
        }

        fn count(&self) -> usize {
            self.seen.lock().len()
        }
    }

    impl Subscribe for Recorder {
        fn deliver(&self, event: Event) -> Result<(), DeliveryError> {
            self.seen.lock().push(event);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    fn ping(n: i64) -> Event {
        Event::new("ping", json!(n)).unwrap()
    }

    fn failing() -> SubscriberRef {
        SubscriberFn::arc("failing", |_| Err(DeliveryError::Closed))
    }

    #[test]
    fn test_ping_scenario() {
        let b = Broadcaster::default();
        let a = Arc::new(Recorder::default());
        let bb = Arc::new(Recorder::default());
        let h1 = b.subscribe(a.clone());
        let _h2 = b.subscribe(bb.clone());

        b.publish(&ping(42));
        assert_eq!(a.payloads(), vec![json!(42)]);
        assert_eq!(bb.payloads(), vec![json!(42)]);
        assert_eq!(a.seen.lock()[0].event_type(), "ping");

        b.unsubscribe(h1);
        b.publish(&ping(43));
        assert_eq!(a.payloads(), vec![json!(42)]);
        assert_eq!(bb.payloads(), vec![json!(42), json!(43)]);
    }

    #[test]
    fn test_unsubscribed_receives_nothing() {
        let b = Broadcaster::default();
        let others: Vec<_> = (0..3).map(|_| Arc::new(Recorder::default())).collect();
        for r in &others {
            b.subscribe(r.clone());
        }
        let gone = Arc::new(Recorder::default());
        let h = b.subscribe(gone.clone());
        assert!(b.unsubscribe(h));

        b.publish(&ping(1));
        assert_eq!(gone.count(), 0);
        assert!(others.iter().all(|r| r.count() == 1));
    }

    #[test]
    fn test_failing_subscriber_is_reaped() {
        let b = Broadcaster::default();
        let s1 = Arc::new(Recorder::default());
        let h1 = b.subscribe(s1.clone());

        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let h2 = b.subscribe(SubscriberFn::arc("s2", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(DeliveryError::rejected("always"))
        }));

        b.publish(&ping(1));
        assert_eq!(s1.count(), 1);
        assert!(!b.contains(h2));
        assert!(b.contains(h1));

        b.publish(&ping(2));
        assert_eq!(s1.payloads(), vec![json!(1), json!(2)]);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_subscriber_is_reaped() {
        let b = Broadcaster::default();
        let ok = Arc::new(Recorder::default());
        b.subscribe(ok.clone());
        let bad = b.subscribe(SubscriberFn::arc("panicky", |_| panic!("boom")));

        b.publish(&ping(1));
        b.publish(&ping(2));

        assert!(!b.contains(bad));
        assert_eq!(ok.count(), 2);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_reaped_then_explicit_unsubscribe_is_noop() {
        let b = Broadcaster::default();
        let keep = b.subscribe(Arc::new(Recorder::default()));
        let h = b.subscribe(failing());

        b.publish(&ping(1));
        assert!(!b.unsubscribe(h));
        assert!(!b.unsubscribe(h));
        assert!(b.contains(keep));
    }

    #[test]
    fn test_reaping_races_explicit_unsubscribe() {
        for _ in 0..50 {
            let b = Broadcaster::default();
            let keep = Arc::new(Recorder::default());
            let keep_handle = b.subscribe(keep.clone());
            let h = b.subscribe(failing());

            let removed = AtomicUsize::new(0);
            std::thread::scope(|s| {
                s.spawn(|| b.publish(&ping(1)));
                for _ in 0..4 {
                    s.spawn(|| {
                        if b.unsubscribe(h) {
                            removed.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                }
            });

            assert!(removed.load(Ordering::SeqCst) <= 1);
            assert!(!b.contains(h));
            assert!(b.contains(keep_handle));
            assert_eq!(b.len(), 1);
            assert_eq!(keep.count(), 1);
        }
    }

    #[test]
    fn test_double_unsubscribe_leaves_others() {
        let b = Broadcaster::default();
        let h1 = b.subscribe(Arc::new(Recorder::default()));
        let h2 = b.subscribe(Arc::new(Recorder::default()));

        assert!(b.unsubscribe(h1));
        assert!(!b.unsubscribe(h1));
        assert!(b.contains(h2));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_concurrent_unsubscribe_same_handle() {
        let b = Broadcaster::default();
        let keep = b.subscribe(Arc::new(Recorder::default()));
        let h = b.subscribe(Arc::new(Recorder::default()));

        let removed = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if b.unsubscribe(h) {
                        removed.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(removed.load(Ordering::SeqCst), 1);
        assert!(b.contains(keep));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_payload_isolation() {
        let b = Broadcaster::default();
        let observed = Arc::new(Mutex::new(Vec::new()));

        for i in 0..4 {
            let observed = Arc::clone(&observed);
            b.subscribe(SubscriberFn::arc("mutator", move |ev: Event| {
                let (_, mut payload) = ev.into_parts();
                observed.lock().push(payload.clone());
                payload["list"] = json!(i);
                Ok(())
            }));
        }

        let ev = Event::new("cfg", json!({"list": [1, 2, 3]})).unwrap();
        let before = ev.clone();
        b.publish(&ev);

        assert_eq!(ev, before);
        let observed = observed.lock();
        assert_eq!(observed.len(), 4);
        assert!(observed.iter().all(|p| p == &json!({"list": [1, 2, 3]})));
    }

    #[test]
    fn test_concurrent_subscribe_then_unsubscribe_leaves_empty() {
        const THREADS: usize = 16;
        const PER_THREAD: usize = 64;

        let b = Broadcaster::default();
        let br = &b;
        let handles: Vec<SubscriptionHandle> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(move || {
                        (0..PER_THREAD)
                            .map(|_| br.subscribe(Arc::new(Recorder::default())))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers.into_iter().flat_map(|w| w.join().unwrap()).collect()
        });

        let mut unique = handles.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), THREADS * PER_THREAD);
        assert_eq!(b.len(), THREADS * PER_THREAD);

        std::thread::scope(|s| {
            for chunk in handles.chunks(PER_THREAD) {
                s.spawn(move || {
                    for h in chunk {
                        assert!(br.unsubscribe(*h));
                    }
                });
            }
        });

        assert!(b.is_empty());
    }

    #[test]
    fn test_publish_concurrent_with_mutation() {
        let b = Broadcaster::default();
        let stable = Arc::new(Recorder::default());
        b.subscribe(stable.clone());

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    b.publish(&ping(i));
                }
            });
            s.spawn(|| {
                for _ in 0..200 {
                    let h = b.subscribe(Arc::new(Recorder::default()));
                    b.unsubscribe(h);
                }
            });
        });

        assert_eq!(stable.count(), 200);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_handles_never_reused() {
        let b = Broadcaster::default();
        let h1 = b.subscribe(Arc::new(Recorder::default()));
        b.unsubscribe(h1);
        let h2 = b.subscribe(Arc::new(Recorder::default()));
        assert_ne!(h1, h2);
        assert!(h2 > h1);
    }

    #[test]
    fn test_same_callback_twice_gets_two_handles() {
        let b = Broadcaster::default();
        let rec = Arc::new(Recorder::default());
        let h1 = b.subscribe(rec.clone());
        let h2 = b.subscribe(rec.clone());
        assert_ne!(h1, h2);

        b.publish(&ping(1));
        assert_eq!(rec.count(), 2);

        b.unsubscribe(h1);
        b.publish(&ping(2));
        assert_eq!(rec.count(), 3);
    }

    #[test]
    fn test_reentrant_callback_does_not_deadlock() {
        let b = Arc::new(Broadcaster::default());
        let late = Arc::new(Recorder::default());
        let own_handle = Arc::new(Mutex::new(None::<SubscriptionHandle>));

        let weak = Arc::downgrade(&b);
        let late_sub = late.clone();
        let own = Arc::clone(&own_handle);
        let h = b.subscribe(SubscriberFn::arc("reentrant", move |_| {
            if let Some(b) = weak.upgrade() {
                b.subscribe(late_sub.clone());
                if let Some(me) = *own.lock() {
                    b.unsubscribe(me);
                }
            }
            Ok(())
        }));
        *own_handle.lock() = Some(h);

        b.publish(&ping(1));
        assert_eq!(late.count(), 0);
        assert!(!b.contains(h));

        b.publish(&ping(2));
        assert_eq!(late.payloads(), vec![json!(2)]);
    }

    #[test]
    fn test_detached_outside_runtime_falls_back_inline() {
        let b = Broadcaster::new(Config::default().with_delivery(DeliveryMode::Detached));
        let rec = Arc::new(Recorder::default());
        b.subscribe(rec.clone());
        let bad = b.subscribe(failing());

        b.publish(&ping(5));
        assert_eq!(rec.count(), 1);
        assert!(!b.contains(bad));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_detached_delivery_reaps_asynchronously() {
        let b = Broadcaster::new(Config::default().with_delivery(DeliveryMode::Detached));
        let rec = Arc::new(Recorder::default());
        let good = b.subscribe(rec.clone());
        let bad = b.subscribe(failing());

        b.publish(&ping(7));

        for _ in 0..200 {
            if rec.count() == 1 && !b.contains(bad) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(rec.payloads(), vec![json!(7)]);
        assert!(!b.contains(bad));
        assert!(b.contains(good));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_detached_blocking_subscriber_does_not_stall_runtime() {
        let b = Broadcaster::new(Config::default().with_delivery(DeliveryMode::Detached));
        let (gate_tx, gate_rx) = std::sync::mpsc::channel::<()>();
        let gate_rx = Mutex::new(gate_rx);

        // 1 = released by the gate, 2 = gave up waiting
        let outcome = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&outcome);
        b.subscribe(SubscriberFn::arc("blocking", move |_| {
            let res = match gate_rx.lock().recv_timeout(Duration::from_secs(2)) {
                Ok(()) => 1,
                Err(_) => 2,
            };
            flag.store(res, Ordering::SeqCst);
            Ok(())
        }));

        b.publish(&ping(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        gate_tx.send(()).unwrap();

        for _ in 0..400 {
            if outcome.load(Ordering::SeqCst) != 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(outcome.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_is_singleton() {
        let a = Broadcaster::shared();
        let b = Broadcaster::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&17_u8), "unknown panic");
    }
}
