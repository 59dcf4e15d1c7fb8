//! Zero-argument observer registry with token-based unsubscription.
//!
//! # Invariants
//! - Callbacks run synchronously, in registration order.
//! - `notify` iterates a snapshot; registry changes made by a running callback
//!   take effect on the next notification.
//! - Unsubscribing removes exactly one registration and is idempotent.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Callback = Rc<dyn Fn()>;

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_token: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback)>>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(self: &Rc<Self>, callback: impl Fn() + 'static) -> Subscription {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.entries.borrow_mut().push((token, Rc::new(callback)));
        Subscription {
            registry: Rc::downgrade(self),
            token,
        }
    }

    fn remove(&self, token: u64) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != token);
        entries.len() != before
    }

    /// Invokes every registered callback; returns how many ran.
    pub(crate) fn notify(&self) -> usize {
        let snapshot: Vec<Callback> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in &snapshot {
            callback();
        }
        snapshot.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Handle returned by `ContactStore::subscribe`.
///
/// Dropping the handle keeps the registration alive; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    registry: Weak<ObserverRegistry>,
    token: u64,
}

impl Subscription {
    /// Removes this registration. Returns `false` when it was already gone
    /// (or the store itself was dropped).
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.token))
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ObserverRegistry, Subscription};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn notify_runs_in_registration_order() {
        let registry = Rc::new(ObserverRegistry::default());
        let order = Rc::new(RefCell::new(Vec::new()));
        for label in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            let _ = registry.subscribe(move || order.borrow_mut().push(label));
        }

        assert_eq!(registry.notify(), 3);
        assert_eq!(*order.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn double_unsubscribe_is_idempotent() {
        let registry = Rc::new(ObserverRegistry::default());
        let subscription = registry.subscribe(|| {});
        assert!(subscription.unsubscribe());
        assert!(!subscription.unsubscribe());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn same_callback_registered_twice_fires_twice() {
        let registry = Rc::new(ObserverRegistry::default());
        let calls = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let calls = Rc::clone(&calls);
            let _ = registry.subscribe(move || calls.set(calls.get() + 1));
        }
        registry.notify();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn self_unsubscribe_during_notify_still_completes_round() {
        let registry = Rc::new(ObserverRegistry::default());
        let calls = Rc::new(Cell::new(0));
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let first = {
            let handle = Rc::clone(&handle);
            let calls = Rc::clone(&calls);
            registry.subscribe(move || {
                calls.set(calls.get() + 1);
                if let Some(subscription) = handle.borrow().as_ref() {
                    subscription.unsubscribe();
                }
            })
        };
        *handle.borrow_mut() = Some(first);
        let second_calls = Rc::new(Cell::new(0));
        {
            let second_calls = Rc::clone(&second_calls);
            let _ = registry.subscribe(move || second_calls.set(second_calls.get() + 1));
        }

        registry.notify();
        registry.notify();

        assert_eq!(calls.get(), 1);
        assert_eq!(second_calls.get(), 2);
    }
}
