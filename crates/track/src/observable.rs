//! Single-threaded observable store.
//!
//! An [`Observable`] owns a value and notifies subscribers synchronously after
//! every write. Clones share the same value, the same subscribers and the same
//! [`ObservableId`].

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OBSERVABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a store, stable across clones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObservableId(u64);

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observable-{}", self.0)
    }
}

struct Subscriber<T> {
    id: u64,
    active: Cell<bool>,
    callback: RefCell<Box<dyn FnMut(&T)>>,
}

struct Inner<T> {
    id: ObservableId,
    value: RefCell<T>,
    subscribers: RefCell<Vec<Rc<Subscriber<T>>>>,
    next_subscriber: Cell<u64>,
}

impl<T> Inner<T> {
    fn unsubscribe(&self, subscriber_id: u64) {
        let mut subscribers = self.subscribers.borrow_mut();
        if let Some(index) = subscribers.iter().position(|s| s.id == subscriber_id) {
            subscribers.remove(index).active.set(false);
        }
    }
}

pub struct Observable<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value)
            .finish()
    }
}

impl<T: 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                id: ObservableId(NEXT_OBSERVABLE_ID.fetch_add(1, Ordering::Relaxed)),
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> ObservableId {
        self.inner.id
    }

    /// Borrow the current value.
    ///
    /// # Panics
    ///
    /// Panics if called from inside [`Observable::update`] on the same store.
    pub fn get(&self) -> Ref<'_, T> {
        self.inner.value.borrow()
    }

    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Register `callback` for every future write.
    ///
    /// The callback is not invoked with the current value. Subscribers must
    /// not write to the store they are being notified by.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);

        self.inner.subscribers.borrow_mut().push(Rc::new(Subscriber {
            id,
            active: Cell::new(true),
            callback: RefCell::new(Box::new(callback)),
        }));

        let inner: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.unsubscribe(id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn notify(&self) {
        // Snapshot so subscribers may cancel (or subscribe) while being notified
        let subscribers: Vec<Rc<Subscriber<T>>> = self.inner.subscribers.borrow().clone();
        let value = self.inner.value.borrow();

        for subscriber in subscribers {
            if !subscriber.active.get() {
                continue;
            }
            let mut callback = subscriber.callback.borrow_mut();
            (*callback)(&*value);
        }
    }
}

/// Handle returned by [`Observable::subscribe`]. Dropping it unsubscribes.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_see_every_write() {
        let store = Observable::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        let _subscription = store.subscribe(move |value: &i32| log.borrow_mut().push(*value));

        store.set(2);
        store.update(|value| *value += 10);

        assert_eq!(*seen.borrow(), vec![2, 12]);
        assert_eq!(*store.get(), 12);
    }

    #[test]
    fn test_subscribe_does_not_replay_current_value() {
        let store = Observable::new("initial");
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        let _subscription = store.subscribe(move |_: &&str| counter.set(counter.get() + 1));

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_cancel_and_drop_unsubscribe() {
        let store = Observable::new(0);
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        let explicit = store.subscribe(move |_: &i32| counter.set(counter.get() + 1));
        let counter = Rc::clone(&calls);
        let dropped = store.subscribe(move |_: &i32| counter.set(counter.get() + 1));
        assert_eq!(store.subscriber_count(), 2);

        explicit.cancel();
        drop(dropped);
        store.set(1);

        assert_eq!(calls.get(), 0);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_cancel_during_notification() {
        let store = Observable::new(0);
        let calls = Rc::new(Cell::new(0));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let slot = Rc::clone(&second);
        let _first = store.subscribe(move |_: &i32| {
            if let Some(subscription) = slot.borrow_mut().take() {
                subscription.cancel();
            }
        });

        let counter = Rc::clone(&calls);
        *second.borrow_mut() = Some(store.subscribe(move |_: &i32| counter.set(counter.get() + 1)));

        store.set(1);
        store.set(2);

        assert_eq!(calls.get(), 0);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_clones_share_identity() {
        let store = Observable::new(0);
        let clone = store.clone();
        clone.set(5);

        assert_eq!(store.id(), clone.id());
        assert_eq!(*store.get(), 5);
        assert_ne!(store.id(), Observable::new(0).id());
    }

    #[test]
    fn test_subscription_outlives_store() {
        let store = Observable::new(0);
        let subscription = store.subscribe(|_: &i32| {});
        drop(store);
        subscription.cancel();
    }
}
