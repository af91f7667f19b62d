//! Thread-safe single-value subject.
//!
//! # Invariants
//! 1. `get()` never blocks and returns the value of the last completed `set`.
//! 2. Version increments exactly once per `set`.
//! 3. Subscribers are notified in registration order, synchronously, after the write.
//! 4. A subscription is never called after `unsubscribe()` returns.
//!
//! Callbacks run while the writer lock is held. They may read the observable
//! and drop subscriptions, but must not call `set` or `subscribe` on the same
//! observable.

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = Arc<dyn Fn(&Arc<T>) + Send + Sync>;

struct Subscriber<T> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback<T>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: Arc::clone(&self.active),
            callback: Arc::clone(&self.callback),
        }
    }
}

struct Registry<T> {
    next_id: u64,
    subscribers: Vec<Subscriber<T>>,
}

struct Shared<T> {
    value: ArcSwap<T>,
    version: AtomicU64,
    /// Serializes write-and-notify and initial delivery.
    writer: Mutex<()>,
    registry: Mutex<Registry<T>>,
}

fn lock<G>(mutex: &Mutex<G>) -> MutexGuard<'_, G> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A shared, observable value.
///
/// Clones share the same slot and subscriber list.
pub struct Observable<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: ArcSwap::from_pointee(initial),
                version: AtomicU64::new(0),
                writer: Mutex::new(()),
                registry: Mutex::new(Registry {
                    next_id: 0,
                    subscribers: Vec::new(),
                }),
            }),
        }
    }

    /// Current value. Two calls with no `set` in between return the same `Arc`.
    pub fn get(&self) -> Arc<T> {
        self.shared.value.load_full()
    }

    /// Replace the value and notify every subscriber.
    pub fn set(&self, value: T) {
        self.set_shared(Arc::new(value));
    }

    /// Like [`Observable::set`], for a value that is already shared.
    pub fn set_shared(&self, value: Arc<T>) {
        let _writer = lock(&self.shared.writer);

        self.shared.value.store(Arc::clone(&value));
        self.shared.version.fetch_add(1, Ordering::SeqCst);

        for subscriber in self.snapshot() {
            if subscriber.active.load(Ordering::SeqCst) {
                (subscriber.callback)(&value);
            }
        }
    }

    /// Register a callback. It is called once right away with the current
    /// value, then after every `set` until the subscription is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let _writer = lock(&self.shared.writer);

        let active = Arc::new(AtomicBool::new(true));
        let callback: Callback<T> = Arc::new(callback);
        let id = {
            let mut registry = lock(&self.shared.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push(Subscriber {
                id,
                active: Arc::clone(&active),
                callback: Arc::clone(&callback),
            });
            id
        };

        callback(&self.get());

        let weak: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        Subscription {
            id,
            active,
            detach: Some(Box::new(move |id| {
                if let Some(shared) = weak.upgrade() {
                    lock(&shared.registry).subscribers.retain(|s| s.id != id);
                }
            })),
            hooks: Vec::new(),
        }
    }

    /// Number of `set` calls so far.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.registry).subscribers.len()
    }

    /// A handle that can read and subscribe but not write.
    pub fn read_only(&self) -> ReadOnlyObservable<T> {
        ReadOnlyObservable {
            inner: self.clone(),
        }
    }

    fn snapshot(&self) -> Vec<Subscriber<T>> {
        lock(&self.shared.registry).subscribers.clone()
    }
}

impl<T: Default + Send + Sync + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug + Send + Sync + 'static> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.get())
            .field("version", &self.version())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Read-only view of an [`Observable`].
pub struct ReadOnlyObservable<T> {
    inner: Observable<T>,
}

impl<T> Clone for ReadOnlyObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> ReadOnlyObservable<T> {
    pub fn get(&self) -> Arc<T> {
        self.inner.get()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.inner.subscribe(callback)
    }

    pub fn version(&self) -> u64 {
        self.inner.version()
    }
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    detach: Option<Box<dyn FnOnce(u64) + Send + Sync>>,
    hooks: Vec<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Run `hook` once, after the callback has been removed.
    pub fn on_detach<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    fn detach_now(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
        for hook in self.hooks.drain(..) {
            hook();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
