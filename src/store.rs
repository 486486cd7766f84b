//! Observable value container.
//!
//! A [`Store`] owns a value and a list of subscribers. Every committed
//! mutation notifies all subscribers synchronously, in subscription order,
//! with a reference to the new value. Nothing is scheduled or deferred.
//!
//! # Example
//!
//! ```
//! use rawview::Store;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let seen = Rc::new(Cell::new(0));
//! let mut store = Store::new(1);
//!
//! let sink = Rc::clone(&seen);
//! store.subscribe(move |value: &i32| sink.set(*value));
//!
//! store.set(5);
//! assert_eq!(seen.get(), 5);
//! ```

use std::fmt;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// A value with synchronous change notification.
pub struct Store<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: u64,
}

impl<T> Store<T> {
    /// Create a store holding `value` with no subscribers.
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Borrow the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and notify subscribers.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers once.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.notify();
    }

    /// Register a subscriber.
    ///
    /// The subscriber is not called with the current value; it only sees
    /// mutations committed after this call.
    pub fn subscribe<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        let value = &self.value;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(value);
        }
    }
}

impl<T: Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
