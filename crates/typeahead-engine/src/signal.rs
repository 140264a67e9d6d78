#![forbid(unsafe_code)]

//! Signals emitted to collaborators, with RAII subscriptions.
//!
//! [`SignalHub`] is a single-threaded subscriber list over
//! `Rc<RefCell<..>>` shared ownership. [`SignalHub::subscribe`] returns a
//! [`Subscription`] guard that detaches the callback when dropped, so a
//! host that tears down its widget cannot leak notifications into dead
//! state.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    emission.
//! 3. Emission snapshots the subscriber list first, so a callback may
//!    subscribe, detach, or re-enter the engine without invalidating the
//!    in-flight delivery.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::transport::TransportError;

/// The value bound to the input, as reported through
/// [`TypeaheadSignal::ValueChanged`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue<T> {
    /// A committed candidate selection.
    Candidate(T),
    /// Raw typed text (absent under force-select).
    Text(String),
    /// No valid value yet: typing under force-select withholds the text
    /// until a candidate is selected.
    Unset,
}

/// Signals emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeaheadSignal<T> {
    /// The bound value changed (typing or selection).
    ValueChanged(BoundValue<T>),
    /// An asynchronous lookup was dispatched.
    Loading,
    /// An asynchronous lookup completed, whether or not its result was
    /// applied.
    Loaded,
    /// An asynchronous lookup failed; the suggestion list is unchanged.
    LoadedError(TransportError),
}

type Callback<T> = Rc<dyn Fn(&TypeaheadSignal<T>)>;

struct HubInner<T> {
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// Subscriber registry for [`TypeaheadSignal`] delivery.
pub struct SignalHub<T> {
    inner: Rc<RefCell<HubInner<T>>>,
}

impl<T> Clone for SignalHub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SignalHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("subscribers", &self.inner.borrow().subscribers.len())
            .finish()
    }
}

impl<T> Default for SignalHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SignalHub<T> {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Deliver a signal to every subscriber, in registration order.
    pub fn emit(&self, signal: &TypeaheadSignal<T>) {
        let callbacks: Vec<Callback<T>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for cb in callbacks {
            cb(signal);
        }
    }
}

impl<T: 'static> SignalHub<T> {
    /// Register a subscriber. The returned guard detaches it on drop.
    #[must_use]
    pub fn subscribe(&self, f: impl Fn(&TypeaheadSignal<T>) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::new(f)));
            id
        };
        let weak: Weak<RefCell<HubInner<T>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }
}

/// RAII guard for a signal subscription.
///
/// Dropping the guard detaches the callback. [`Subscription::detach`] does
/// the same explicitly, for call sites where the intent should be visible.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Detach now instead of at drop time.
    pub fn detach(mut self) {
        if let Some(f) = self.detach.take() {
            f();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(f) = self.detach.take() {
            f();
        }
    }
}
