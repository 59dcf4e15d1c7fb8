//! Observable contact store.
//!
//! # Responsibility
//! - Own the authoritative, insertion-ordered contact sequence.
//! - Mirror the full sequence to durable storage on every mutation.
//! - Notify subscribers after each mutation.
//!
//! # Invariants
//! - Contact ids are unique within one store instance.
//! - A mutation is persisted before it becomes visible in memory; a failed
//!   write leaves memory and subscribers untouched.
//! - `update` on an unknown id neither writes nor notifies; `delete` always
//!   writes and notifies.
//! - Returned collections are snapshots, never live views.

use crate::model::contact::{
    create_contact, Contact, ContactFields, ContactId, ContactPatch, IdGenerator, UuidIdGenerator,
};
use crate::storage::KeyValueStorage;
use crate::store::observer::{ObserverRegistry, Subscription};
use crate::store::{StoreResult, CONTACTS_STORAGE_KEY};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ContactStore {
    storage: Rc<dyn KeyValueStorage>,
    id_generator: Box<dyn IdGenerator>,
    contacts: RefCell<Vec<Contact>>,
    observers: Rc<ObserverRegistry>,
}

impl ContactStore {
    /// Loads the store from `storage` using random UUID identifiers.
    ///
    /// # Errors
    /// - Returns `StoreError::Storage` when the backing cannot be read.
    ///
    /// Malformed stored JSON is not an error: the store starts empty and the
    /// bad record is overwritten by the next mutation.
    pub fn open(storage: Rc<dyn KeyValueStorage>) -> StoreResult<Self> {
        Self::open_with_generator(storage, Box::new(UuidIdGenerator))
    }

    /// Same as [`ContactStore::open`] with a caller-chosen id source.
    pub fn open_with_generator(
        storage: Rc<dyn KeyValueStorage>,
        id_generator: Box<dyn IdGenerator>,
    ) -> StoreResult<Self> {
        let contacts = load_contacts(storage.as_ref())?;
        Ok(Self {
            storage,
            id_generator,
            contacts: RefCell::new(contacts),
            observers: Rc::new(ObserverRegistry::default()),
        })
    }

    /// Registers a zero-argument callback run after every mutation.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn get_all(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    /// Contacts whose name or email contains `term`, ignoring case.
    ///
    /// An empty term returns everything.
    pub fn get_filtered(&self, term: &str) -> Vec<Contact> {
        if term.is_empty() {
            return self.get_all();
        }
        let needle = term.to_lowercase();
        self.contacts
            .borrow()
            .iter()
            .filter(|contact| contact.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: &ContactId) -> Option<Contact> {
        self.contacts
            .borrow()
            .iter()
            .find(|contact| &contact.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.contacts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.borrow().is_empty()
    }

    /// Creates, appends and persists a contact, then notifies.
    ///
    /// Generated ids already held by the store are skipped, so a
    /// deterministic generator reopened over saved contacts stays unique.
    pub fn add(&self, fields: ContactFields) -> StoreResult<Contact> {
        let mut next = self.get_all();
        let ids = UnusedIds {
            inner: self.id_generator.as_ref(),
            taken: &next,
        };
        let contact = create_contact(&ids, fields);
        next.push(contact.clone());
        self.commit(next, "add")?;
        Ok(contact)
    }

    /// Merges `patch` into the contact with `id`.
    ///
    /// Returns `Ok(None)` when no such contact exists; in that case storage
    /// is not written and subscribers are not notified.
    pub fn update(&self, id: &ContactId, patch: &ContactPatch) -> StoreResult<Option<Contact>> {
        let mut next = self.get_all();
        let Some(target) = next.iter_mut().find(|contact| &contact.id == id) else {
            debug!("event=store_update module=store status=miss id={id}");
            return Ok(None);
        };
        target.apply(patch);
        let updated = target.clone();
        self.commit(next, "update")?;
        Ok(Some(updated))
    }

    /// Removes the contact with `id`; returns whether one was removed.
    ///
    /// Persists and notifies even when nothing matched.
    pub fn delete(&self, id: &ContactId) -> StoreResult<bool> {
        let mut next = self.get_all();
        let before = next.len();
        next.retain(|contact| &contact.id != id);
        let removed = next.len() != before;
        if !removed {
            debug!("event=store_delete module=store status=miss id={id}");
        }
        self.commit(next, "delete")?;
        Ok(removed)
    }

    fn commit(&self, next: Vec<Contact>, op: &'static str) -> StoreResult<()> {
        let serialized = serde_json::to_string(&next)?;
        if let Err(err) = self.storage.set_item(CONTACTS_STORAGE_KEY, &serialized) {
            warn!("event=store_persist module=store status=error op={op} error={err}");
            return Err(err.into());
        }
        debug!(
            "event=store_persist module=store status=ok op={} count={} bytes={}",
            op,
            next.len(),
            serialized.len()
        );

        *self.contacts.borrow_mut() = next;

        let notified = self.observers.notify();
        debug!("event=store_notify module=store status=ok op={op} observers={notified}");
        Ok(())
    }
}

struct UnusedIds<'a> {
    inner: &'a dyn IdGenerator,
    taken: &'a [Contact],
}

impl IdGenerator for UnusedIds<'_> {
    fn next_id(&self) -> ContactId {
        loop {
            let id = self.inner.next_id();
            if !self.taken.iter().any(|contact| contact.id == id) {
                return id;
            }
            debug!("event=store_add module=store status=id_taken id={id}");
        }
    }
}

fn load_contacts(storage: &dyn KeyValueStorage) -> StoreResult<Vec<Contact>> {
    let Some(raw) = storage.get_item(CONTACTS_STORAGE_KEY)? else {
        debug!("event=store_load module=store status=empty");
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<Contact>>(&raw) {
        Ok(contacts) => {
            debug!(
                "event=store_load module=store status=ok count={}",
                contacts.len()
            );
            Ok(contacts)
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=reset bytes={} error={}",
                raw.len(),
                err
            );
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContactStore;
    use crate::model::contact::{ContactFields, SequentialIdGenerator};
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::store::CONTACTS_STORAGE_KEY;
    use std::rc::Rc;

    #[test]
    fn malformed_record_resets_to_empty_until_next_write() {
        let storage = Rc::new(MemoryStorage::with_entries([(
            CONTACTS_STORAGE_KEY,
            "{not json",
        )]));
        let store = ContactStore::open_with_generator(
            storage.clone(),
            Box::new(SequentialIdGenerator::new("id")),
        )
        .unwrap();

        assert!(store.is_empty());
        assert_eq!(
            storage.get_item(CONTACTS_STORAGE_KEY).unwrap().as_deref(),
            Some("{not json")
        );

        store.add(ContactFields::new("A", "a@test.com")).unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&storage.get_item(CONTACTS_STORAGE_KEY).unwrap().unwrap())
                .unwrap();
        assert_eq!(saved.as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn get_all_returns_detached_snapshot() {
        let store = ContactStore::open(Rc::new(MemoryStorage::new())).unwrap();
        store.add(ContactFields::new("A", "a@test.com")).unwrap();

        let mut snapshot = store.get_all();
        snapshot.clear();

        assert_eq!(store.len(), 1);
    }
}
