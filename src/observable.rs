//! Single-value broadcast cell for state exposed to the presentation layer.
//!
//! A subscriber gets the current value first and then every update in the
//! order it was published. Delivery goes through unbounded channels, so
//! publishing never blocks and never runs subscriber code.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub struct Observable<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    value: T,
    subscribers: Vec<UnboundedSender<T>>,
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            inner: Mutex::new(Inner {
                value,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn set(&self, value: T) {
        self.lock().publish(value);
    }

    pub fn subscribe(&self) -> UnboundedReceiver<T> {
        let (sender, receiver) = unbounded_channel();
        let mut inner = self.lock();
        if sender.send(inner.value.clone()).is_ok() {
            inner.subscribers.push(sender);
        }
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + PartialEq> Observable<T> {
    /// Publish only when the value differs from the current one.
    pub fn set_if_changed(&self, value: T) -> bool {
        let mut inner = self.lock();
        if inner.value == value {
            return false;
        }
        inner.publish(value);
        true
    }
}

impl<T: Clone> Inner<T> {
    fn publish(&mut self, value: T) {
        self.subscribers
            .retain(|subscriber| subscriber.send(value.clone()).is_ok());
        self.value = value;
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Observable::new(T::default())
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Observable").field(&self.get()).finish()
    }
}
