//! Synchronous multi-subscriber output channels.

use std::cell::{Cell, RefCell};
use std::fmt;

/// Handle returned by [`Signal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Box<dyn FnMut(&T)>;

/// Ordered, synchronous event channel.
///
/// Subscribers run in subscription order on the thread that fires. A
/// subscriber may subscribe or unsubscribe while being called; the change
/// takes effect from the next `fire`.
pub struct Signal<T> {
    next_id: Cell<u64>,
    firing: Cell<bool>,
    handlers: RefCell<Vec<(SubscriptionId, Handler<T>)>>,
    removed: RefCell<Vec<SubscriptionId>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            next_id: Cell::new(0),
            firing: Cell::new(false),
            handlers: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl<T> Signal<T> {
    /// Channel without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`; it receives every later event.
    pub fn subscribe(&self, handler: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Box::new(handler)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if self.firing.get() {
            // Handlers are checked out; drop it when the fire returns.
            self.removed.borrow_mut().push(id);
        } else {
            self.handlers
                .borrow_mut()
                .retain(|(existing, _)| *existing != id);
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Deliver `value` to every subscriber in order.
    pub fn fire(&self, value: &T) {
        let mut current = std::mem::take(&mut *self.handlers.borrow_mut());
        let was_firing = self.firing.replace(true);
        for (id, handler) in current.iter_mut() {
            if self.removed.borrow().contains(id) {
                continue;
            }
            handler(value);
        }
        self.firing.set(was_firing);
        let mut handlers = self.handlers.borrow_mut();
        // Subscribed while firing: keep after the existing ones.
        current.append(&mut handlers);
        let removed = std::mem::take(&mut *self.removed.borrow_mut());
        current.retain(|(id, _)| !removed.contains(id));
        *handlers = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn recorder<T: Clone + 'static>(signal: &Signal<T>) -> Rc<RefCell<Vec<T>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        signal.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
        seen
    }

    #[test]
    fn fires_in_subscription_order() {
        let signal = Signal::<u32>::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b"] {
            let order = order.clone();
            signal.subscribe(move |v: &u32| order.borrow_mut().push(format!("{tag}{v}")));
        }
        signal.fire(&1);
        signal.fire(&2);
        assert_eq!(*order.borrow(), vec!["a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let signal = Signal::<u32>::new();
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        let id = signal.subscribe(move |_| counter.set(counter.get() + 1));
        signal.fire(&0);
        signal.unsubscribe(id);
        signal.fire(&0);
        assert_eq!(seen.get(), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn subscribing_during_fire_takes_effect_next_time() {
        let signal = Rc::new(Signal::<u32>::new());
        let late = Rc::new(RefCell::new(Vec::new()));
        {
            let signal_ref = Rc::downgrade(&signal);
            let late = late.clone();
            let added = Cell::new(false);
            signal.subscribe(move |_| {
                if added.replace(true) {
                    return;
                }
                if let Some(signal) = signal_ref.upgrade() {
                    let late = late.clone();
                    signal.subscribe(move |v: &u32| late.borrow_mut().push(*v));
                }
            });
        }
        signal.fire(&1);
        signal.fire(&2);
        assert_eq!(*late.borrow(), vec![2]);
        assert_eq!(signal.subscriber_count(), 2);
    }

    #[test]
    fn unsubscribing_during_fire_skips_later_handler() {
        let signal = Rc::new(Signal::<()>::new());
        let victim = Rc::new(Cell::new(None));
        let hits = Rc::new(Cell::new(0));
        {
            let signal_ref = Rc::downgrade(&signal);
            let victim = victim.clone();
            signal.subscribe(move |_| {
                if let (Some(signal), Some(id)) = (signal_ref.upgrade(), victim.get()) {
                    signal.unsubscribe(id);
                }
            });
        }
        let counter = hits.clone();
        victim.set(Some(signal.subscribe(move |_| counter.set(counter.get() + 1))));
        signal.fire(&());
        signal.fire(&());
        assert_eq!(hits.get(), 0);
        assert_eq!(signal.subscriber_count(), 1);
    }

    #[test]
    fn recorder_sees_values() {
        let signal = Signal::<String>::new();
        let seen = recorder(&signal);
        signal.fire(&"x".to_string());
        assert_eq!(*seen.borrow(), vec!["x".to_string()]);
    }
}
