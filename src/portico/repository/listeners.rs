//! Change subscriptions.
//!
//! Callbacks run synchronously on the repository's thread, after the local
//! mirror has been written. A [`Subscription`] owns the registration: drop it
//! (or call [`Subscription::unsubscribe`]) and the callback is never invoked
//! again, so a view that went away cannot receive late results.

use crate::model::ProjectId;
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A full list was fetched from the remote store and mirrored.
    Synced,
    /// A project was created or modified through this repository.
    Mutated { id: ProjectId },
    Deleted { id: ProjectId },
    /// Site settings (social links, display mode) changed.
    Settings,
    /// Another writer sharing the mirror changed it.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn now(kind: ChangeKind) -> Self {
        Self {
            kind,
            at: Utc::now(),
        }
    }
}

type Callback = Rc<dyn Fn(&ChangeEvent)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

#[derive(Clone, Default)]
pub struct Listeners {
    registry: Rc<RefCell<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.insert(id, Rc::new(callback));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Invokes every live callback in subscription order.
    pub fn notify(&self, event: &ChangeEvent) {
        // Snapshot first: a callback may drop its own or another subscription.
        let callbacks: Vec<(u64, Callback)> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(id, cb)| (*id, Rc::clone(cb)))
            .collect();

        for (id, callback) in callbacks {
            let live = self.registry.borrow().callbacks.contains_key(&id);
            if live {
                callback(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live registration returned by `on_change`. Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().callbacks.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notifies_until_dropped() {
        let listeners = Listeners::new();
        let hits = Rc::new(Cell::new(0));

        let counter = Rc::clone(&hits);
        let sub = listeners.subscribe(move |_| counter.set(counter.get() + 1));

        listeners.notify(&ChangeEvent::now(ChangeKind::Synced));
        assert_eq!(hits.get(), 1);

        drop(sub);
        listeners.notify(&ChangeEvent::now(ChangeKind::Synced));
        assert_eq!(hits.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn unsubscribe_from_inside_a_callback() {
        let listeners = Listeners::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let second_hits = Rc::new(Cell::new(0));

        let slot_in = Rc::clone(&slot);
        let _first = listeners.subscribe(move |_| {
            slot_in.borrow_mut().take();
        });
        let hits = Rc::clone(&second_hits);
        *slot.borrow_mut() = Some(listeners.subscribe(move |_| hits.set(hits.get() + 1)));

        listeners.notify(&ChangeEvent::now(ChangeKind::Mutated { id: 1 }));
        assert_eq!(second_hits.get(), 0);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let listeners = Listeners::new();
        let sub = listeners.subscribe(|_| {});
        drop(listeners);
        sub.unsubscribe();
    }
}
