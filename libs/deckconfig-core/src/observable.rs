//! Push-based values with subscribe/unsubscribe.
//!
//! Derived views publish through `Observable`, so a UI layer can attach any
//! number of observers without the state knowing which framework renders them.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    next_id: u64,
    observers: Vec<(u64, Callback<T>)>,
}

/// A value that notifies observers whenever it is set.
///
/// Clones share the same value and observer list.
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Store a new value and push it to every attached observer.
    pub(crate) fn set(&self, value: T) {
        let observers: Vec<Callback<T>> = {
            let mut inner = lock(&self.inner);
            inner.value = value.clone();
            inner.observers.iter().map(|(_, f)| Arc::clone(f)).collect()
        };
        // Lock released so callbacks may subscribe or unsubscribe.
        for observer in observers {
            observer(&value);
        }
    }

    /// Attach an observer. It is called with the current value right away.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Callback<T> = Arc::new(observer);
        let (id, current) = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::clone(&observer)));
            (id, inner.value.clone())
        };
        observer(&current);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    lock(&inner).observers.retain(|(other, _)| *other != id);
                }
            })),
        }
    }

    /// Number of attached observers.
    pub fn observer_count(&self) -> usize {
        lock(&self.inner).observers.len()
    }

    /// Read-only handle sharing this value.
    pub fn view(&self) -> View<T> {
        View {
            source: self.clone(),
        }
    }
}

/// Read side of an [`Observable`]: observers can read and subscribe, but
/// only the owner can publish.
pub struct View<T> {
    source: Observable<T>,
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> View<T> {
    pub fn get(&self) -> T {
        self.source.get()
    }

    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.source.subscribe(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.source.observer_count()
    }
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    // A panicking observer never runs while the lock is held.
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle returned by [`Observable::subscribe`].
///
/// Dropping the handle leaves the observer attached; call `unsubscribe` to detach.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Detach the observer. Safe to call after the observable is gone.
    pub fn unsubscribe(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
