//! Synchronous publish/subscribe with explicit disposer handles.
//!
//! Delivery happens on the caller's stack, in subscription order, exactly once
//! per `notify`. Subscribers may unsubscribe (themselves or others) from inside
//! a callback; the current notification still completes for the snapshot
//! taken when it started.

#[cfg(test)]
#[path = "observer_test.rs"]
mod observer_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use uuid::Uuid;

/// Identifier for a single subscription.
pub type SubscriptionId = Uuid;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Entry<T> {
    id: SubscriptionId,
    callback: Callback<T>,
}

type Subscribers<T> = Rc<RefCell<Vec<Entry<T>>>>;

/// A typed subscriber list for one event category.
pub struct Observable<T> {
    subscribers: Subscribers<T>,
}

impl<T> Default for Observable<T> {
    fn default() -> Self {
        Self { subscribers: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<T: 'static> Observable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; dropping the returned handle does *not* unsubscribe.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let id = Uuid::new_v4();
        self.subscribers
            .borrow_mut()
            .push(Entry { id, callback: Rc::new(RefCell::new(callback)) });
        let weak: Weak<RefCell<Vec<Entry<T>>>> = Rc::downgrade(&self.subscribers);
        Subscription {
            id,
            remove: Box::new(move |id| {
                weak.upgrade().is_some_and(|subs| {
                    let mut subs = subs.borrow_mut();
                    let before = subs.len();
                    subs.retain(|entry| entry.id != id);
                    subs.len() != before
                })
            }),
        }
    }

    /// Deliver `event` to every current subscriber.
    pub fn notify(&self, event: &T) {
        let snapshot: Vec<Callback<T>> = self
            .subscribers
            .borrow()
            .iter()
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        for callback in snapshot {
            // A callback that re-enters notify on itself is skipped rather than aliased.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                callback(event);
            }
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscriber.
    pub fn clear(&self) {
        self.subscribers.borrow_mut().clear();
    }
}

/// Handle returned by [`Observable::subscribe`].
pub struct Subscription {
    id: SubscriptionId,
    remove: Box<dyn Fn(SubscriptionId) -> bool>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the subscriber. Returns `false` if it was already gone or the
    /// observable has been dropped.
    pub fn unsubscribe(&self) -> bool {
        (self.remove)(self.id)
    }
}

/// A subscription spanning several observables, removed together.
#[derive(Debug, Default)]
pub struct SubscriptionGroup {
    members: Vec<Subscription>,
}

impl SubscriptionGroup {
    #[must_use]
    pub fn new(members: Vec<Subscription>) -> Self {
        Self { members }
    }

    /// Remove every member; returns whether any was still registered.
    pub fn unsubscribe(&self) -> bool {
        self.members
            .iter()
            .fold(false, |any, member| member.unsubscribe() || any)
    }
}
