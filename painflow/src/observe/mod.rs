//! Observer registry shared by the pipeline engine and the live delta store.
//!
//! Writers publish immutable `Arc<T>` snapshots; observers are plain
//! callbacks. Publication is serialised by a re-entrant lock, so snapshots
//! reach observers in the order the state changed, and an observer may call
//! back into its source on the same thread.

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::warn;

/// Callback invoked with every published snapshot.
pub type Observer<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct Registry<T> {
    observers: RwLock<Vec<(u64, Observer<T>)>>,
    next_id: AtomicU64,
}

trait Deregister: Send + Sync {
    fn remove(&self, id: u64);
}

impl<T: Send + Sync + 'static> Deregister for Registry<T> {
    fn remove(&self, id: u64) {
        self.observers.write().retain(|(existing, _)| *existing != id);
    }
}

/// Fan-out of snapshots to any number of observers.
pub struct Publisher<T> {
    registry: Arc<Registry<T>>,
    order: ReentrantMutex<()>,
}

impl<T: Send + Sync + 'static> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Publisher<T> {
    /// Creates a publisher with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                observers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
            order: ReentrantMutex::new(()),
        }
    }

    /// Registers an observer. It stays registered until the returned
    /// [`Subscription`] is used to unsubscribe or the publisher is cleared.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.observers.write().push((id, Arc::new(observer)));

        let registry: Arc<dyn Deregister> = self.registry.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.observers.read().len()
    }

    /// Drops every observer.
    pub fn clear(&self) {
        self.registry.observers.write().clear();
    }

    /// Runs `produce` and publishes the snapshot it returns, if any.
    ///
    /// `produce` is where the caller mutates its own state; holding the
    /// ordering lock across it keeps publication order equal to mutation
    /// order. Returns whether anything was published.
    pub fn publish_with<F>(&self, produce: F) -> bool
    where
        F: FnOnce() -> Option<Arc<T>>,
    {
        let _order = self.order.lock();
        match produce() {
            Some(snapshot) => {
                self.notify(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Holds the ordering lock for a multi-step update made of several
    /// `publish_with` calls. Re-entrant on the current thread.
    pub fn hold_order(&self) -> ReentrantMutexGuard<'_, ()> {
        self.order.lock()
    }

    fn notify(&self, snapshot: &Arc<T>) {
        // Iterate over a copy so observers can (un)subscribe from inside a callback.
        let observers: Vec<Observer<T>> = self
            .registry
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                observer(snapshot);
            })) {
                warn!("Observer panicked: {:?}", e);
            }
        }
    }
}

impl<T> std::fmt::Debug for Publisher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("observers", &self.registry.observers.read().len())
            .finish()
    }
}

/// Handle returned by `subscribe`. Dropping it does not unsubscribe.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Deregister>,
}

impl Subscription {
    /// Removes the observer. Idempotent; safe to call from inside the observer.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_publish_reaches_all_observers() {
        let publisher: Publisher<u32> = Publisher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3 {
            let seen = seen.clone();
            let _ = publisher.subscribe(move |v: &Arc<u32>| seen.lock().push((tag, **v)));
        }

        assert!(publisher.publish_with(|| Some(Arc::new(7))));
        let mut seen = seen.lock().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_publish_nothing() {
        let publisher: Publisher<u32> = Publisher::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let _ = publisher.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!publisher.publish_with(|| None));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let publisher: Publisher<u32> = Publisher::new();
        let sub = publisher.subscribe(|_| {});
        assert_eq!(publisher.observer_count(), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(publisher.observer_count(), 0);
    }

    #[test]
    fn test_unsubscribe_during_notify_does_not_skip_others() {
        let publisher: Publisher<u32> = Publisher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot_in = slot.clone();
        let first = publisher.subscribe(move |_| {
            if let Some(sub) = slot_in.lock().as_ref() {
                sub.unsubscribe();
            }
        });
        *slot.lock() = Some(first);

        let c = calls.clone();
        let _ = publisher.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        publisher.publish_with(|| Some(Arc::new(1)));
        publisher.publish_with(|| Some(Arc::new(2)));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(publisher.observer_count(), 1);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let publisher: Publisher<u32> = Publisher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let _ = publisher.subscribe(|_| panic!("observer failure"));
        let c = calls.clone();
        let _ = publisher.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        publisher.publish_with(|| Some(Arc::new(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_publish_from_observer() {
        let publisher: Arc<Publisher<u32>> = Arc::new(Publisher::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner = Arc::downgrade(&publisher);
        let s = seen.clone();
        let _ = publisher.subscribe(move |v: &Arc<u32>| {
            s.lock().push(**v);
            if **v == 1 {
                if let Some(p) = inner.upgrade() {
                    p.publish_with(|| Some(Arc::new(2)));
                }
            }
        });

        publisher.publish_with(|| Some(Arc::new(1)));
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_subscription_outlives_publisher() {
        let publisher: Publisher<u32> = Publisher::new();
        let sub = publisher.subscribe(|_| {});
        drop(publisher);
        sub.unsubscribe();
    }
}
