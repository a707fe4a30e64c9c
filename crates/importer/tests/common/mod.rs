use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;
use importer::ContactStore;
use storage::{
    error::{Result, StorageError},
    models::{Contact, Json, NewContact},
    repository::contact::BulkInsertReport,
};
use uuid::Uuid;

/// In-memory stand-in for the contacts table, enforcing the same
/// `(owner, email)` uniqueness as the database index.
#[derive(Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<Contact>>,
    calls: AtomicUsize,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, owner_id: Uuid, email: &str) {
        let contact = NewContact {
            email: email.to_string(),
            ..Default::default()
        };
        self.contacts.lock().unwrap().push(stored(owner_id, &contact));
    }

    pub fn contacts_for(&self, owner_id: Uuid) -> Vec<Contact> {
        self.contacts
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn find(&self, owner_id: Uuid, email: &str) -> Option<Contact> {
        self.contacts_for(owner_id)
            .into_iter()
            .find(|c| c.email == email)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn stored(owner_id: Uuid, contact: &NewContact) -> Contact {
    let now = Utc::now();
    Contact {
        contact_id: Uuid::new_v4(),
        owner_id,
        email: contact.email.clone(),
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        company: contact.company.clone(),
        tags: Json(contact.tags.clone()),
        notes: contact.notes.clone(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait::async_trait]
impl ContactStore for MemoryStore {
    async fn insert_many_unordered(
        &self,
        owner_id: Uuid,
        candidates: &[NewContact],
    ) -> Result<BulkInsertReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut contacts = self.contacts.lock().unwrap();
        let mut inserted = Vec::new();
        for candidate in candidates {
            let taken = contacts
                .iter()
                .any(|c| c.owner_id == owner_id && c.email == candidate.email);
            if taken {
                continue;
            }
            let contact = stored(owner_id, candidate);
            contacts.push(contact.clone());
            inserted.push(contact);
        }

        Ok(BulkInsertReport::reconcile(candidates, inserted))
    }
}
