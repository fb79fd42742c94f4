/*
 * An explicit subject/observer cell, the building block for every piece of
 * mirrored backend state in this layer. Mutations run as one synchronous
 * snapshot-read -> mutate -> broadcast cycle: all current subscribers are
 * notified before the mutating call returns, and no partially-applied state
 * is ever observable. Execution is single-threaded and cooperative, so no
 * locking is involved; handles are cheap `Rc` clones.
 *
 * Listeners may read the observable (e.g. call `snapshot`) and may
 * subscribe or unsubscribe — including removing themselves — from inside a
 * notification; such changes take effect for the next broadcast, not the
 * one in flight. What listeners must not do is mutate the same
 * observable's value reentrantly.
 */
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener<T> = Box<dyn FnMut(&T)>;

// Each listener sits in its own slot so delivery can run without keeping
// the listener list borrowed.
type ListenerSlot<T> = Rc<RefCell<Listener<T>>>;

struct ObservableInner<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(SubscriptionId, ListenerSlot<T>)>>,
    next_subscription_id: Cell<u64>,
}

pub struct Observable<T> {
    inner: Rc<ObservableInner<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        Observable {
            inner: Rc::new(ObservableInner {
                value: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_subscription_id: Cell::new(1),
            }),
        }
    }

    /* Runs `f` against the current value without cloning it. */
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /*
     * Registers a listener and returns the id needed to unsubscribe it.
     * The listener is not called with the current value on registration;
     * callers that need it take a `snapshot` first.
     */
    pub fn subscribe(&self, listener: Listener<T>) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription_id.get());
        self.inner.next_subscription_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(listener))));
        id
    }

    /* Returns whether a listener with that id was actually registered. */
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /* Full overwrite, broadcast to all subscribers before returning. */
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.broadcast();
    }

    /* Applies `f` to the current value in place, then broadcasts. */
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut value = self.inner.value.borrow_mut();
            f(&mut value);
        }
        self.broadcast();
    }

    /*
     * Delivers to the listeners registered at the start of the broadcast.
     * The listener list is only borrowed to take that snapshot of slot
     * handles, never while a listener runs, so listeners are free to
     * subscribe or unsubscribe on this observable during delivery.
     */
    fn broadcast(&self) {
        let slots: Vec<ListenerSlot<T>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, slot)| Rc::clone(slot))
            .collect();
        let value = self.inner.value.borrow();
        for slot in slots {
            (slot.borrow_mut())(&value);
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn snapshot(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.inner.value.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
